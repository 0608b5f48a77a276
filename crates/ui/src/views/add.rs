use dioxus::prelude::*;

use trivia_core::model::CategoryId;

use services::QuestionDraft;

use crate::context::AppContext;
use crate::views::{view_state_from_resource, ViewError, ViewState};

#[derive(Clone, Debug, PartialEq, Eq)]
enum SaveState {
    Idle,
    Saving,
    Success,
    Error(ViewError),
}

/// Form for adding a new question to the bank.
#[component]
pub fn AddQuestionView() -> Element {
    let ctx = use_context::<AppContext>();
    let provider = ctx.provider();

    let mut prompt = use_signal(String::new);
    let mut answer = use_signal(String::new);
    let mut difficulty = use_signal(|| 1_u32);
    let mut category_id = use_signal(|| None::<u64>);
    let mut save_state = use_signal(|| SaveState::Idle);

    let provider_for_categories = provider.clone();
    let categories_resource = use_resource(move || {
        let provider = provider_for_categories.clone();
        async move {
            provider
                .list_categories()
                .await
                .map_err(|_| ViewError::LoadCategories)
        }
    });
    let categories = view_state_from_resource(&categories_resource);

    let form_valid = !prompt().trim().is_empty() && !answer().trim().is_empty();

    rsx! {
        div { class: "page",
            h2 { "Add a New Trivia Question" }
            match categories {
                ViewState::Idle | ViewState::Loading => rsx! { p { "Loading categories..." } },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = categories_resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(list) => {
                    // The select defaults to its first option, so an untouched
                    // dropdown means the first category.
                    let fallback_category = list.first().map(|c| c.id().value());
                    rsx! {
                    form {
                        class: "add-question-form",
                        onsubmit: {
                            let provider = provider.clone();
                            move |evt: FormEvent| {
                                evt.prevent_default();
                                if !form_valid || save_state() == SaveState::Saving {
                                    return;
                                }
                                let Some(chosen) = category_id().or(fallback_category) else {
                                    return;
                                };
                                let provider = provider.clone();
                                let draft = QuestionDraft {
                                    prompt: prompt().trim().to_string(),
                                    answer: answer().trim().to_string(),
                                    category_id: CategoryId::new(chosen),
                                    difficulty: difficulty(),
                                };
                                save_state.set(SaveState::Saving);
                                spawn(async move {
                                    match provider.create_question(&draft).await {
                                        Ok(_) => {
                                            prompt.set(String::new());
                                            answer.set(String::new());
                                            difficulty.set(1);
                                            save_state.set(SaveState::Success);
                                        }
                                        Err(_) => {
                                            save_state.set(SaveState::Error(ViewError::SaveQuestion));
                                        }
                                    }
                                });
                            }
                        },
                        label { class: "field",
                            span { "Question" }
                            input {
                                r#type: "text",
                                name: "question",
                                value: "{prompt()}",
                                oninput: move |evt| {
                                    prompt.set(evt.value());
                                    save_state.set(SaveState::Idle);
                                },
                            }
                        }
                        label { class: "field",
                            span { "Answer" }
                            input {
                                r#type: "text",
                                name: "answer",
                                value: "{answer()}",
                                oninput: move |evt| {
                                    answer.set(evt.value());
                                    save_state.set(SaveState::Idle);
                                },
                            }
                        }
                        label { class: "field",
                            span { "Difficulty" }
                            select {
                                name: "difficulty",
                                value: "{difficulty()}",
                                onchange: move |evt| {
                                    if let Ok(level) = evt.value().parse::<u32>() {
                                        difficulty.set(level.clamp(1, 5));
                                    }
                                },
                                for level in 1..=5_u32 {
                                    option { value: "{level}", "{level}" }
                                }
                            }
                        }
                        label { class: "field",
                            span { "Category" }
                            select {
                                name: "category",
                                value: category_id().map(|id| id.to_string()).unwrap_or_default(),
                                onchange: move |evt| {
                                    if let Ok(id) = evt.value().parse::<u64>() {
                                        category_id.set(Some(id));
                                    }
                                },
                                for category in list {
                                    option {
                                        value: "{category.id()}",
                                        "{category.label()}"
                                    }
                                }
                            }
                        }
                        input {
                            class: "button",
                            r#type: "submit",
                            value: "Submit",
                            disabled: !form_valid || save_state() == SaveState::Saving,
                        }
                        match save_state() {
                            SaveState::Idle => rsx! {},
                            SaveState::Saving => rsx! { span { "Saving..." } },
                            SaveState::Success => rsx! { span { "Question added." } },
                            SaveState::Error(err) => rsx! { span { class: "error", "{err.message()}" } },
                        }
                    }
                    }
                }
            }
        }
    }
}
