use dioxus::prelude::*;

use crate::studio::StudioView;

#[component]
pub fn Studio() -> Element {
    rsx! {
        StudioView {}
    }
}
