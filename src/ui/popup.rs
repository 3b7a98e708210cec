/// Popup UI: bookmarks of the video in the active tab

use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;
use crate::bookmark::Bookmark;
use crate::config::ExtensionConfig;
use crate::host::{self, TabInfo};
use crate::messages::ExtensionMessage;
use crate::storage::{BookmarkStore, ChromeStorage, KeyValueArea};
use crate::ui::components::{BookmarkRow, Notice};
use crate::watch_url::watch_page_video_id;

pub const NOT_WATCH_PAGE: &str = "This is not a YouTube video page.";
pub const NO_BOOKMARKS: &str = "No bookmarks to show.";

#[derive(Clone, Debug, PartialEq)]
pub enum PopupState {
    Loading,
    NotWatchPage,
    Ready {
        tab_id: i32,
        video_id: String,
        bookmarks: Vec<Bookmark>,
    },
    Error(String),
}

/// What the popup shows for `tab`
///
/// Storage is only read when the tab is a watch page with a video id.
pub async fn load_popup<A: KeyValueArea>(
    store: &BookmarkStore<A>,
    tab: &TabInfo,
    config: &ExtensionConfig,
) -> PopupState {
    let Some(video_id) = tab
        .url
        .as_deref()
        .and_then(|url| watch_page_video_id(url, config.video_id_param))
    else {
        return PopupState::NotWatchPage;
    };

    match store.load(&video_id).await {
        Ok(bookmarks) => PopupState::Ready {
            tab_id: tab.id,
            video_id,
            bookmarks: bookmarks.as_slice().to_vec(),
        },
        Err(e) => PopupState::Error(e),
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Loading);

    // Load bookmarks for the active tab on mount
    {
        let state = state.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let config = ExtensionConfig::default();
                let next = match host::active_tab().await {
                    Ok(tab) => load_popup(&BookmarkStore::new(ChromeStorage), &tab, &config).await,
                    Err(e) => PopupState::Error(e),
                };
                state.set(next);
            });
            || ()
        });
    }

    let on_play = {
        let state = state.clone();

        Callback::from(move |bookmark: Bookmark| {
            let PopupState::Ready { tab_id, .. } = &*state else {
                return;
            };
            let tab_id = *tab_id;

            spawn_local(async move {
                let message = ExtensionMessage::Play { value: bookmark.time };
                if let Err(e) = host::send_tab_message(tab_id, &message).await {
                    log::warn!("{}", e);
                }
            });
        })
    };

    // Remove the row right away; the page controller owns the stored list
    let on_delete = {
        let state = state.clone();

        Callback::from(move |bookmark: Bookmark| {
            let PopupState::Ready { tab_id, video_id, bookmarks } = &*state else {
                return;
            };
            let tab_id = *tab_id;

            state.set(PopupState::Ready {
                tab_id,
                video_id: video_id.clone(),
                bookmarks: bookmarks.iter().filter(|b| b.id != bookmark.id).cloned().collect(),
            });

            spawn_local(async move {
                let message = ExtensionMessage::Delete {
                    value: bookmark.time,
                    id: Some(bookmark.id),
                };
                if let Err(e) = host::send_tab_message(tab_id, &message).await {
                    log::warn!("{}", e);
                }
            });
        })
    };

    html! {
        <div class="container">
            {match &*state {
                PopupState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PopupState::NotWatchPage => html! {
                    <Notice message={NOT_WATCH_PAGE} />
                },
                PopupState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                PopupState::Ready { bookmarks, .. } => html! {
                    <>
                        <div class="title">{"Your bookmarks for this video"}</div>
                        <div class="bookmarks" id="bookmarks">
                            if bookmarks.is_empty() {
                                <i>{NO_BOOKMARKS}</i>
                            } else {
                                {for bookmarks.iter().map(|bookmark| html! {
                                    <BookmarkRow
                                        key={bookmark.id.clone()}
                                        bookmark={bookmark.clone()}
                                        on_play={on_play.clone()}
                                        on_delete={on_delete.clone()}
                                    />
                                })}
                            }
                        </div>
                    </>
                },
            }}
        </div>
    }
}
