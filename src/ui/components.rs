/// Reusable UI components

use crate::bookmark::Bookmark;
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct BookmarkRowProps {
    pub bookmark: Bookmark,
    pub on_play: Callback<Bookmark>,
    pub on_delete: Callback<Bookmark>,
}

#[function_component(BookmarkRow)]
pub fn bookmark_row(props: &BookmarkRowProps) -> Html {
    let on_play = props.on_play.reform({
        let bookmark = props.bookmark.clone();
        move |_: MouseEvent| bookmark.clone()
    });
    let on_delete = props.on_delete.reform({
        let bookmark = props.bookmark.clone();
        move |_: MouseEvent| bookmark.clone()
    });

    html! {
        <div class="bookmark" id={format!("bookmark-{}", props.bookmark.id)}>
            <div class="bookmark-title">{&props.bookmark.desc}</div>
            <div class="bookmark-controls">
                <Button onclick={on_play} variant={ButtonVariant::Secondary} size={ButtonSize::Small}>
                    {"▶ Play"}
                </Button>
                <Button onclick={on_delete} variant={ButtonVariant::Danger} size={ButtonSize::Small}>
                    {"✗ Delete"}
                </Button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct NoticeProps {
    pub message: String,
}

/// Centered one-line notice used for the empty and unsupported states
#[function_component(Notice)]
pub fn notice(props: &NoticeProps) -> Html {
    html! {
        <div class="title notice">{&props.message}</div>
    }
}
