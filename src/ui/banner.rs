/// "What's new" banner shown above the side panel

use crate::announcement::AnnouncementItem;
use crate::config::selectors::ANNOUNCEMENT_LEAVING_CLASS;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AnnouncementBannerProps {
    pub items: Vec<AnnouncementItem>,
    /// Fired once, when the reader closes the banner. The owner removes the
    /// banner after the exit animation.
    pub on_dismiss: Callback<()>,
}

#[function_component(AnnouncementBanner)]
pub fn announcement_banner(props: &AnnouncementBannerProps) -> Html {
    let leaving = use_state(|| false);

    let on_close = {
        let leaving = leaving.clone();
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_: MouseEvent| {
            if *leaving {
                return;
            }
            leaving.set(true);
            on_dismiss.emit(());
        })
    };

    let class = classes!(
        "sidesy-announcement",
        (*leaving).then_some(ANNOUNCEMENT_LEAVING_CLASS)
    );

    html! {
        <section {class} role="status">
            <header class="sidesy-announcement__header">
                <span class="sidesy-announcement__heading">{"What's new in Sidesy"}</span>
                <button
                    class="sidesy-announcement__close"
                    aria-label="Dismiss"
                    onclick={on_close}
                >
                    {"×"}
                </button>
            </header>
            <ul class="sidesy-announcement__items">
                { for props.items.iter().map(|item| html! {
                    <li class="sidesy-announcement__item">
                        <strong>{ &item.title }</strong>
                        if let Some(body) = &item.body {
                            <p>{ body }</p>
                        }
                    </li>
                }) }
            </ul>
        </section>
    }
}
