//! The landing screen of the podcast generator.

use std::rc::Rc;

use crate::{
    node::{elements::*, Node},
    notify::Notifier,
};

/// Id of the element the application mounts into.
pub const ROOT_ID: &str = "root";

pub const HEADING: &str = "🎙️ Gerador de Podcast";
pub const DESCRIPTION: &str = "Transforme seus PDFs em podcasts envolventes com a ajuda da IA!";
pub const UPLOAD_LABEL: &str = "Carregar PDF";
pub const UPLOAD_NOTICE: &str = "Botão de upload clicado! (Funcionalidade em breve)";

const CONTAINER_CLASS: &str = "min-h-screen bg-gradient-to-br from-purple-800 to-indigo-900 text-white flex items-center justify-center p-4";
const CARD_CLASS: &str = "bg-white bg-opacity-10 backdrop-blur-md rounded-xl shadow-2xl p-8 md:p-12 text-center max-w-md w-full border border-purple-500";
const HEADING_CLASS: &str = "text-4xl md:text-5xl font-extrabold mb-6 text-purple-200 drop-shadow-lg";
const DESCRIPTION_CLASS: &str = "text-lg md:text-xl mb-8 text-purple-100";
const BUTTON_CLASS: &str = "bg-purple-600 hover:bg-purple-700 text-white font-bold py-3 px-6 rounded-lg transition duration-300 ease-in-out transform hover:scale-105 shadow-lg";

pub fn root_view(notifier: Rc<dyn Notifier>) -> Node {
    let upload = move || notifier.notify(UPLOAD_NOTICE);

    div().class(CONTAINER_CLASS).child(
        div()
            .class(CARD_CLASS)
            .child(h1().class(HEADING_CLASS).child(HEADING))
            .child(p().class(DESCRIPTION_CLASS).child(DESCRIPTION))
            .child(
                button()
                    .class(BUTTON_CLASS)
                    .on("click", upload)
                    .child(UPLOAD_LABEL),
            ),
    )
}

/// The upload button of a tree produced by [`root_view`].
pub fn upload_button(root: &Node) -> Option<&Node> {
    root.find_by_tag("button")
}
