use std::{fmt, rc::Rc};

use indexmap::IndexMap;

pub type Handler = Rc<dyn Fn()>;

/// A node of a static view tree.
///
/// Trees are plain values: they are built once by a render function and never
/// mutated afterwards. Event handlers are carried alongside the markup so that
/// any host (the browser runtime, a terminal preview, a test) can dispatch them.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Node {
    Element(Element),
    Text(String),
    Fragment(Vec<Node>),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Element {
    pub(crate) name: String,
    pub(crate) attrs: IndexMap<String, String>,
    pub(crate) listeners: Vec<Listener>,
    pub(crate) children: Vec<Node>,
}

#[derive(Clone)]
pub struct Listener {
    event: String,
    handler: Handler,
}

impl Listener {
    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn handler(&self) -> Handler {
        self.handler.clone()
    }
}

// Handlers are opaque, so listeners compare by the event they listen to.
impl Eq for Listener {}
impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.event == other.event
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

impl Node {
    // Node Creation //

    pub fn element(name: impl Into<String>) -> Self {
        Self::Element(Element {
            name: name.into(),
            attrs: IndexMap::new(),
            listeners: vec![],
            children: vec![],
        })
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn fragment() -> Self {
        Self::Fragment(vec![])
    }

    // Builders //

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.as_element_mut("attr")
            .attrs
            .insert(key.into(), value.into());
        self
    }

    pub fn class(self, value: impl Into<String>) -> Self {
        self.attr("class", value)
    }

    pub fn id(self, value: impl Into<String>) -> Self {
        self.attr("id", value)
    }

    pub fn on<F>(mut self, event: impl Into<String>, f: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.as_element_mut("on").listeners.push(Listener {
            event: event.into(),
            handler: Rc::new(f),
        });
        self
    }

    pub fn child(mut self, child: impl IntoNode) -> Self {
        let child = child.into_node();
        match &mut self {
            Self::Element(elem) => elem.children.push(child),
            Self::Fragment(children) => children.push(child),
            Self::Text(_) => panic!("text nodes cannot have children"),
        }
        self
    }

    // Queries //

    pub fn element_name(&self) -> Option<&str> {
        match self {
            Self::Element(elem) => Some(&elem.name),
            _ => None,
        }
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        match self {
            Self::Element(elem) => elem.attrs.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        let attrs = match self {
            Self::Element(elem) => Some(&elem.attrs),
            _ => None,
        };
        attrs
            .into_iter()
            .flatten()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn listeners(&self) -> &[Listener] {
        match self {
            Self::Element(elem) => &elem.listeners,
            _ => &[],
        }
    }

    pub fn children(&self) -> &[Self] {
        match self {
            Self::Element(elem) => &elem.children,
            Self::Fragment(children) => children,
            Self::Text(_) => &[],
        }
    }

    /// Concatenates every text node under `self`, in document order.
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            _ => self.children().iter().map(Self::text_content).collect(),
        }
    }

    /// Depth-first search, **including** `self`.
    pub fn find<P>(&self, predicate: P) -> Option<&Self>
    where
        P: Fn(&Self) -> bool + Copy,
    {
        if predicate(self) {
            return Some(self);
        }
        self.children()
            .iter()
            .find_map(|child| child.find(predicate))
    }

    pub fn find_by_tag(&self, name: &str) -> Option<&Self> {
        self.find(|node| node.element_name() == Some(name))
    }

    // Events //

    /// Runs every listener registered on `self` for `event`, returning how many ran.
    pub fn emit(&self, event: &str) -> usize {
        let mut ran = 0;
        for listener in self.listeners() {
            if listener.event == event {
                (listener.handler)();
                ran += 1;
            }
        }
        ran
    }

    fn as_element_mut(&mut self, op: &str) -> &mut Element {
        match self {
            Self::Element(elem) => elem,
            Self::Text(_) => panic!("`{op}` expected element, found text"),
            Self::Fragment(_) => panic!("`{op}` expected element, found fragment"),
        }
    }
}

pub trait IntoNode {
    fn into_node(self) -> Node;
}

impl IntoNode for Node {
    fn into_node(self) -> Node {
        self
    }
}

impl IntoNode for &str {
    fn into_node(self) -> Node {
        Node::text(self)
    }
}

impl IntoNode for String {
    fn into_node(self) -> Node {
        Node::text(self)
    }
}

impl<N> FromIterator<N> for Node
where
    N: IntoNode,
{
    fn from_iter<T: IntoIterator<Item = N>>(iter: T) -> Self {
        Self::Fragment(iter.into_iter().map(IntoNode::into_node).collect())
    }
}

macro_rules! tagged {
    ($($name:ident),* $(,)?) => {
        $(
            pub fn $name() -> Node {
                Node::element(stringify!($name))
            }
        )*
    };
}

pub mod elements {
    use super::Node;

    tagged!(div, h1, p, button);
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::{elements::*, *};

    #[test]
    fn builder_keeps_attribute_order() {
        let node = div().class("a").id("b").attr("data-x", "c");
        let keys: Vec<_> = node.attrs().map(|(key, _)| key).collect();
        assert_eq!(keys, ["class", "id", "data-x"]);
        assert_eq!(node.get_attr("id"), Some("b"));
    }

    #[test]
    fn text_content_and_find() {
        let node = div()
            .child(h1().child("Hello, "))
            .child(p().child("world").child("!"));

        assert_eq!(node.text_content(), "Hello, world!");
        assert_eq!(node.find_by_tag("p").unwrap().text_content(), "world!");
        assert!(node.find_by_tag("button").is_none());
    }

    #[test]
    fn emit_runs_matching_listeners_only() {
        let clicks = Rc::new(Cell::new(0));
        let c = clicks.clone();
        let node = button().on("click", move || c.set(c.get() + 1));

        assert_eq!(node.emit("click"), 1);
        assert_eq!(node.emit("input"), 0);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn equality_ignores_handler_identity() {
        let a = button().on("click", || {});
        let b = button().on("click", || {});
        let c = button().on("input", || {});

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn fragment_from_iterator() {
        let node: Node = ["a", "b"].into_iter().collect();
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.text_content(), "ab");
    }

    #[test]
    #[should_panic(expected = "expected element, found text")]
    fn attr_on_text_panics() {
        let _ = Node::text("x").attr("class", "y");
    }
}
