use std::rc::Rc;

use podcast_view::app::{root_view, ROOT_ID};
use podcast_web::AlertNotifier;

fn main() {
    console_error_panic_hook::set_once();

    let notifier = Rc::new(AlertNotifier);
    if let Err(err) = podcast_web::mount(ROOT_ID, move || root_view(notifier.clone())) {
        panic!("{err}");
    }
}
