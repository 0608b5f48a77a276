use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{AddQuestionView, PlayView, QuestionsView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", QuestionsView)] Questions {},
        #[route("/add", AddQuestionView)] Add {},
        #[route("/play", PlayView)] Play {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Header {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Header() -> Element {
    rsx! {
        header { class: "app-header",
            h1 { "Udacitrivia" }
            nav {
                ul {
                    li { Link { to: Route::Questions {}, "List" } }
                    li { Link { to: Route::Add {}, "Add" } }
                    li { Link { to: Route::Play {}, "Play" } }
                }
            }
        }
    }
}
