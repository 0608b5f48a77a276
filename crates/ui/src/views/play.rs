#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use dioxus::prelude::*;

use trivia_core::model::CategoryChoice;

use crate::context::AppContext;
use crate::views::{view_state_from_resource, ViewError, ViewState};
use crate::vm::{QuizScreen, QuizVm};

/// The quiz play view.
///
/// Renders one of four screens from the session snapshot: category chooser,
/// active question, revealed answer, final score. Every provider round-trip
/// runs behind the `busy` flag so the triggering control cannot be fired
/// twice while a fetch is outstanding.
#[component]
pub fn PlayView() -> Element {
    let ctx = use_context::<AppContext>();
    let flow = ctx.quiz_flow();

    let mut vm = use_signal(|| Some(QuizVm::new()));
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<ViewError>);

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<PlayTestHandles>() {
                handles.register(vm);
            }
        }
    }

    let flow_for_categories = flow.clone();
    let categories_resource = use_resource(move || {
        let flow = flow_for_categories.clone();
        async move {
            flow.list_categories()
                .await
                .map_err(|_| ViewError::LoadCategories)
        }
    });
    let categories = view_state_from_resource(&categories_resource);

    // Owned snapshot so no read guard outlives this scope.
    let snapshot = {
        let guard = vm.read();
        guard.as_ref().map(|view| {
            (
                view.screen(),
                view.prompt().map(str::to_string),
                view.answer().map(str::to_string),
                view.guess().to_string(),
                view.score(),
                view.question_number(),
                view.questions_per_play(),
                view.was_correct(),
            )
        })
    };
    let Some((screen, prompt, answer, guess, score, number, total, was_correct)) = snapshot
    else {
        // The vm is checked out by an in-flight action.
        return rsx! {
            div { class: "quiz-play-holder", p { "Loading..." } }
        };
    };

    let next_question = {
        let flow = flow.clone();
        move |_| {
            if busy() {
                return;
            }
            let flow = flow.clone();
            spawn(async move {
                busy.set(true);
                error.set(None);
                let taken = vm.write().take();
                let Some(mut value) = taken else {
                    busy.set(false);
                    return;
                };
                if let Err(err) = value.next_question(&flow).await {
                    error.set(Some(err));
                }
                vm.set(Some(value));
                busy.set(false);
            });
        }
    };

    let retry_initial = {
        let flow = flow.clone();
        move |_| {
            if busy() {
                return;
            }
            let flow = flow.clone();
            spawn(async move {
                busy.set(true);
                error.set(None);
                let taken = vm.write().take();
                let Some(mut value) = taken else {
                    busy.set(false);
                    return;
                };
                if let Err(err) = value.retry_initial(&flow).await {
                    error.set(Some(err));
                }
                vm.set(Some(value));
                busy.set(false);
            });
        }
    };

    match screen {
        QuizScreen::CategoryChooser => rsx! {
            div { class: "quiz-play-holder",
                h2 { class: "choose-header", "Choose Category" }
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
                    ViewState::Ready(list) => rsx! {
                        div { class: "category-holder",
                            button {
                                class: "play-category btn",
                                r#type: "button",
                                disabled: busy(),
                                onclick: {
                                    let flow = flow.clone();
                                    move |_| {
                                        if busy() {
                                            return;
                                        }
                                        let flow = flow.clone();
                                        spawn(async move {
                                            busy.set(true);
                                            error.set(None);
                                            let taken = vm.write().take();
                                            let Some(mut value) = taken else {
                                                busy.set(false);
                                                return;
                                            };
                                            if let Err(err) =
                                                value.select_category(&flow, CategoryChoice::All).await
                                            {
                                                error.set(Some(err));
                                            }
                                            vm.set(Some(value));
                                            busy.set(false);
                                        });
                                    }
                                },
                                "ALL"
                            }
                            for category in list {
                                button {
                                    key: "{category.id()}",
                                    class: "play-category btn",
                                    r#type: "button",
                                    disabled: busy(),
                                    onclick: {
                                        let flow = flow.clone();
                                        let category = category.clone();
                                        move |_| {
                                            if busy() {
                                                return;
                                            }
                                            let flow = flow.clone();
                                            let choice = CategoryChoice::One(category.clone());
                                            spawn(async move {
                                                busy.set(true);
                                                error.set(None);
                                                let taken = vm.write().take();
                                                let Some(mut value) = taken else {
                                                    busy.set(false);
                                                    return;
                                                };
                                                if let Err(err) =
                                                    value.select_category(&flow, choice).await
                                                {
                                                    error.set(Some(err));
                                                }
                                                vm.set(Some(value));
                                                busy.set(false);
                                            });
                                        }
                                    },
                                    "{category.label()}"
                                }
                            }
                        }
                        if let Some(err) = error() {
                            p { class: "error", "{err.message()}" }
                        }
                    },
                }
            }
        },
        QuizScreen::Question => rsx! {
            div { class: "quiz-play-holder",
                if let Some(prompt) = prompt {
                    p { class: "quiz-counter", "Question {number} of {total}" }
                    div { class: "quiz-question", "{prompt}" }
                    form {
                        onsubmit: move |evt| {
                            evt.prevent_default();
                            if let Some(value) = vm.write().as_mut() {
                                if let Err(err) = value.submit_guess() {
                                    error.set(Some(err));
                                }
                            }
                        },
                        input {
                            r#type: "text",
                            name: "guess",
                            value: "{guess}",
                            oninput: move |evt| {
                                if let Some(value) = vm.write().as_mut() {
                                    value.update_guess(evt.value());
                                }
                            },
                        }
                        input {
                            class: "submit-guess button",
                            r#type: "submit",
                            value: "Submit Answer",
                        }
                    }
                } else if let Some(err) = error() {
                    p { class: "error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        disabled: busy(),
                        onclick: retry_initial,
                        "Retry"
                    }
                } else {
                    p { "Loading question..." }
                }
            }
        },
        QuizScreen::Answer => rsx! {
            div { class: "quiz-play-holder",
                if let Some(prompt) = prompt {
                    div { class: "quiz-question", "{prompt}" }
                }
                match was_correct {
                    Some(true) => rsx! { div { class: "correct", "You were correct!" } },
                    Some(false) => rsx! { div { class: "wrong", "You were incorrect" } },
                    None => rsx! {},
                }
                if let Some(answer) = answer {
                    div { class: "quiz-answer", "{answer}" }
                }
                if let Some(err) = error() {
                    p { class: "error", "{err.message()}" }
                }
                button {
                    class: "next-question button",
                    r#type: "button",
                    disabled: busy(),
                    onclick: next_question,
                    "Next Question"
                }
            }
        },
        QuizScreen::FinalScore => rsx! {
            div { class: "quiz-play-holder",
                div { class: "final-header", "Your Final Score is {score}" }
                button {
                    class: "play-again button btn",
                    r#type: "button",
                    onclick: move |_| {
                        error.set(None);
                        if let Some(value) = vm.write().as_mut() {
                            value.restart();
                        }
                    },
                    "Play Again?"
                }
            }
        },
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct PlayTestHandles {
    vm: Rc<RefCell<Option<Signal<Option<QuizVm>>>>>,
}

#[cfg(test)]
impl PlayTestHandles {
    pub(crate) fn register(&self, vm: Signal<Option<QuizVm>>) {
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn vm(&self) -> Signal<Option<QuizVm>> {
        (*self.vm.borrow()).expect("play vm registered")
    }
}
