use dioxus::prelude::*;

use trivia_core::model::{CategoryId, QuestionId};

use crate::context::AppContext;
use crate::views::{view_state_from_resource, ViewError, ViewState};
use crate::vm::{map_question_rows, page_count, QuestionRowVm};

/// Paginated question list with category filter, prompt search, and
/// per-question delete.
#[component]
pub fn QuestionsView() -> Element {
    let ctx = use_context::<AppContext>();
    let provider = ctx.provider();

    let mut page = use_signal(|| 1_u64);
    let mut search = use_signal(String::new);
    let mut submitted_term = use_signal(|| None::<String>);
    let mut category_filter = use_signal(|| None::<u64>);
    let mut open_answer = use_signal(|| None::<u64>);

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

    let provider_for_resource = provider.clone();
    let resource = use_resource(move || {
        let provider = provider_for_resource.clone();
        let term = submitted_term();
        let category = category_filter();
        let page = page();
        async move {
            let result = match (term.as_deref(), category) {
                (Some(term), _) if !term.trim().is_empty() => {
                    provider.search_questions(term).await
                }
                (_, Some(id)) => {
                    provider
                        .questions_in_category(CategoryId::new(id), page as u32)
                        .await
                }
                _ => provider.list_questions(page as u32).await,
            };
            result
                .map(|fetched| (map_question_rows(&fetched), fetched.total))
                .map_err(|_| ViewError::LoadQuestions)
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Questions" }
            // Searching and the category filter are mutually exclusive, as in
            // the server API: search spans every category.
            select {
                class: "category-filter",
                value: category_filter().map(|id| id.to_string()).unwrap_or_default(),
                onchange: move |evt| {
                    page.set(1);
                    open_answer.set(None);
                    submitted_term.set(None);
                    category_filter.set(evt.value().parse::<u64>().ok());
                },
                option { value: "", "All categories" }
                match categories {
                    ViewState::Idle | ViewState::Loading => rsx! {
                        option { value: "", "Loading categories..." }
                    },
                    ViewState::Error(_) => rsx! {
                        option { value: "", "Categories unavailable" }
                    },
                    ViewState::Ready(list) => rsx! {
                        for category in list {
                            option { value: "{category.id()}", "{category.label()}" }
                        }
                    },
                }
            }
            form {
                class: "question-search",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    page.set(1);
                    open_answer.set(None);
                    category_filter.set(None);
                    submitted_term.set(Some(search()));
                },
                input {
                    r#type: "text",
                    placeholder: "Search questions...",
                    value: "{search()}",
                    oninput: move |evt| search.set(evt.value()),
                }
                input { r#type: "submit", value: "Search" }
                if submitted_term().is_some() {
                    button {
                        r#type: "button",
                        class: "btn btn-secondary",
                        onclick: move |_| {
                            search.set(String::new());
                            submitted_term.set(None);
                            page.set(1);
                        },
                        "Clear"
                    }
                }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! { p { "Loading questions..." } },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready((rows, total)) => rsx! {
                    if rows.is_empty() {
                        p { "No questions found." }
                    }
                    ul { class: "question-list",
                        for row in rows {
                            QuestionRow {
                                row: row.clone(),
                                revealed: open_answer() == Some(row.id),
                                on_toggle: move |id: u64| {
                                    if open_answer() == Some(id) {
                                        open_answer.set(None);
                                    } else {
                                        open_answer.set(Some(id));
                                    }
                                },
                                on_delete: {
                                    let provider = provider.clone();
                                    move |id: u64| {
                                        let provider = provider.clone();
                                        spawn(async move {
                                            if provider
                                                .delete_question(QuestionId::new(id))
                                                .await
                                                .is_ok()
                                            {
                                                let mut resource = resource;
                                                resource.restart();
                                            }
                                        });
                                    }
                                },
                            }
                        }
                    }
                    if submitted_term().is_none() {
                        div { class: "pagination",
                            button {
                                r#type: "button",
                                disabled: page() <= 1,
                                onclick: move |_| {
                                    open_answer.set(None);
                                    page.set(page().saturating_sub(1).max(1));
                                },
                                "Previous"
                            }
                            span { "Page {page()} of {page_count(total)}" }
                            button {
                                r#type: "button",
                                disabled: page() >= page_count(total),
                                onclick: move |_| {
                                    open_answer.set(None);
                                    page.set(page() + 1);
                                },
                                "Next"
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn QuestionRow(
    row: QuestionRowVm,
    revealed: bool,
    on_toggle: EventHandler<u64>,
    on_delete: EventHandler<u64>,
) -> Element {
    let id = row.id;
    rsx! {
        li { class: "question-row",
            div { class: "question-row-main",
                p { class: "question-prompt", "{row.prompt}" }
                span { class: "question-meta", "{row.category_label} · {row.difficulty_label}" }
            }
            div { class: "question-row-actions",
                button {
                    r#type: "button",
                    class: "btn btn-secondary",
                    onclick: move |_| on_toggle.call(id),
                    if revealed { "Hide Answer" } else { "Show Answer" }
                }
                button {
                    r#type: "button",
                    class: "btn btn-danger",
                    onclick: move |_| on_delete.call(id),
                    "Delete"
                }
            }
            if revealed {
                p { class: "question-answer", "Answer: {row.answer}" }
            }
        }
    }
}
