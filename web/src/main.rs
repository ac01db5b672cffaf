use dioxus::prelude::*;

use ui::views::{About, Studio};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Studio {},
    #[route("/about")]
    About {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        Router::<Route> {}
    }
}

/// Web navbar wrapping every route.
#[component]
fn WebNavbar() -> Element {
    rsx! {
        nav { class: "navbar",
            span { class: "navbar__brand", "Styleshift" }
            div { class: "navbar__links",
                Link { class: "navbar__link", to: Route::Studio {}, "Studio" }
                Link { class: "navbar__link", to: Route::About {}, "About" }
            }
        }
        Outlet::<Route> {}
    }
}
