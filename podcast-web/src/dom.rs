use podcast_view::Node;
use wasm_bindgen::{intern, prelude::*};

type EventClosure = Closure<dyn Fn(web_sys::Event)>;

/// Native DOM nodes created from a view tree.
///
/// Owns the event closures bound while building; dropping the tree detaches
/// nothing from the document but invalidates its listeners.
pub struct DomTree {
    roots: Vec<web_sys::Node>,
    closures: Vec<EventClosure>,
}

impl DomTree {
    pub fn build(document: &web_sys::Document, node: &Node) -> Result<Self, JsValue> {
        let mut tree = Self {
            roots: vec![],
            closures: vec![],
        };
        tree.roots = tree.create(document, node)?;
        Ok(tree)
    }

    /// Top-level native nodes, in order. Fragments are flattened away.
    pub fn roots(&self) -> &[web_sys::Node] {
        &self.roots
    }

    pub fn listener_count(&self) -> usize {
        self.closures.len()
    }

    pub fn mount(&self, parent: &web_sys::Node) -> Result<(), JsValue> {
        for native in &self.roots {
            parent.append_child(native)?;
        }
        Ok(())
    }

    fn create(
        &mut self,
        document: &web_sys::Document,
        node: &Node,
    ) -> Result<Vec<web_sys::Node>, JsValue> {
        match node {
            Node::Element(_) => {
                let name = node.element_name().unwrap_or_default();
                let element = document.create_element(intern(name))?;

                for (key, value) in node.attrs() {
                    element.set_attribute(intern(key), value)?;
                }

                for listener in node.listeners() {
                    let handler = listener.handler();
                    let closure = EventClosure::new(move |_ev: web_sys::Event| handler());
                    element.add_event_listener_with_callback(
                        intern(listener.event()),
                        closure.as_ref().unchecked_ref(),
                    )?;
                    self.closures.push(closure);
                }

                for child in node.children() {
                    for native in self.create(document, child)? {
                        element.append_child(&native)?;
                    }
                }

                Ok(vec![element.unchecked_into()])
            }
            Node::Text(value) => {
                let text = document.create_text_node(value);
                Ok(vec![text.unchecked_into()])
            }
            Node::Fragment(children) => {
                let mut out = vec![];
                for child in children {
                    out.extend(self.create(document, child)?);
                }
                Ok(out)
            }
        }
    }
}
