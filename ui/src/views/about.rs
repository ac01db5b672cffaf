use dioxus::prelude::*;

use crate::core::occasion::Occasion;
use crate::core::uploads::MAX_OUTFITS;

#[component]
pub fn About() -> Element {
    rsx! {
        section { class: "page page-about",
            h1 { "About Styleshift" }
            p {
                "Upload up to {MAX_OUTFITS} outfit photos and Styleshift sends each one to a "
                "stylization service that reimagines it for three occasions. Results arrive "
                "asynchronously; the studio keeps checking until every look is ready."
            }

            h2 { "The styles" }
            ul { class: "page-about__styles",
                for occasion in Occasion::ALL {
                    li {
                        strong { "{occasion.label()} Style: " }
                        "{occasion.blurb()}"
                    }
                }
            }

            p { class: "page-about__note",
                "Your photos stay in the browser session; only the stylization service "
                "receives a copy of each submitted outfit."
            }
        }
    }
}
