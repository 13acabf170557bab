use std::{fmt, time::Duration};

#[derive(Clone, Copy, Debug)]
pub struct FileSize(pub u64);

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const UNITS: [&str; 3] = ["B", "KB", "MB"];
        if self.0 == 0 {
            return write!(f, "0B");
        }
        let mut value = self.0 as f64;
        let mut unit = 0;
        // anything that rounds to 1000.0 moves up a unit
        while value >= 999.95 && unit < UNITS.len() - 1 {
            value /= 1000.0;
            unit += 1;
        }

        write!(f, "{value:.1}{}", UNITS[unit])
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Elapsed(pub Duration);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let secs = self.0.as_secs();
        if secs >= 60 {
            write!(f, "{}m {:02}s", secs / 60, secs % 60)
        } else {
            write!(f, "{}.{:02}s", secs, self.0.subsec_nanos() / 10_000_000)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sizes() {
        assert_eq!(FileSize(0).to_string(), "0B");
        assert_eq!(FileSize(512).to_string(), "512.0B");
        assert_eq!(FileSize(1_500).to_string(), "1.5KB");
        assert_eq!(FileSize(2_000_000).to_string(), "2.0MB");
        assert_eq!(FileSize(3_000_000_000).to_string(), "3000.0MB");
    }

    #[test]
    fn file_sizes_round_into_the_next_unit() {
        assert_eq!(FileSize(999).to_string(), "999.0B");
        assert_eq!(FileSize(1_000).to_string(), "1.0KB");
        assert_eq!(FileSize(999_940).to_string(), "999.9KB");
        assert_eq!(FileSize(999_999).to_string(), "1.0MB");
    }

    #[test]
    fn elapsed() {
        assert_eq!(Elapsed(Duration::from_millis(1_250)).to_string(), "1.25s");
        assert_eq!(Elapsed(Duration::from_secs(75)).to_string(), "1m 15s");
    }
}
