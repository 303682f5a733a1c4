use dioxus::prelude::*;

use crate::core::auth::{AuthClient, SupportTicket, TicketPriority};
use crate::core::platform;
use crate::core::session::Session;
use crate::core::status::{begin_if_idle, ActionStatus};

#[component]
pub fn Support() -> Element {
    let mut subject = use_signal(String::new);
    let mut content = use_signal(String::new);
    let mut priority = use_signal(TicketPriority::default);
    let mut status = use_signal(ActionStatus::default);
    let mut busy = use_signal(|| false);

    let session_ctx: Option<Signal<Session>> = try_use_context::<Signal<Session>>();
    let token = session_ctx
        .map(|session| session())
        .and_then(|session| session.token().map(str::to_string));

    let Some(token) = token else {
        return rsx! {
            section { class: "page page-support",
                h1 { "Support" }
                p { class: "support-form__note", "Sign in to submit a ticket." }
            }
        };
    };

    let feedback = match &status() {
        ActionStatus::Idle => None,
        ActionStatus::Working(label) => {
            Some(("support-form__meta".to_string(), format!("{label}…")))
        }
        ActionStatus::Done(message) => Some((
            "support-form__meta support-form__meta--success".to_string(),
            format!("✅ {message}"),
        )),
        ActionStatus::Error(err) => Some((
            "support-form__meta support-form__meta--error".to_string(),
            format!("⚠️ {err}"),
        )),
    };

    let priority_value = priority().wire_value();
    let priority_options: Vec<(&'static str, &'static str)> = TicketPriority::ALL
        .into_iter()
        .map(|level| (level.wire_value(), level.label()))
        .collect();

    let submit_handler = move |_| {
        if !busy.with_mut(begin_if_idle) {
            return;
        }
        let subject_value = subject().trim().to_string();
        let content_value = content().trim().to_string();
        if subject_value.is_empty() || content_value.is_empty() {
            status.set(ActionStatus::Error(
                "Subject and description are both required.".to_string(),
            ));
            busy.set(false);
            return;
        }
        status.set(ActionStatus::Working("Submitting the ticket"));
        let ticket = SupportTicket {
            subject: subject_value,
            content: content_value,
            priority: priority(),
        };
        let token = token.clone();
        platform::spawn_future(async move {
            match AuthClient::from_env().submit_ticket(&token, &ticket).await {
                Ok(()) => {
                    subject.set(String::new());
                    content.set(String::new());
                    priority.set(TicketPriority::default());
                    status.set(ActionStatus::Done(
                        "Ticket submitted. The team will reach out by email.".to_string(),
                    ));
                }
                Err(err) => status.set(ActionStatus::Error(err.to_string())),
            }
            busy.set(false);
        });
    };

    rsx! {
        section { class: "page page-support",
            h1 { "Support" }
            p { "Something off with an analysis? Send the team a ticket." }

            div { class: "support-form",
                label { class: "support-form__field",
                    span { "Subject" }
                    input {
                        r#type: "text",
                        value: "{subject}",
                        oninput: move |evt| subject.set(evt.value()),
                    }
                }

                label { class: "support-form__field",
                    span { "Description" }
                    textarea {
                        rows: "6",
                        value: "{content}",
                        oninput: move |evt| content.set(evt.value()),
                    }
                }

                label { class: "support-form__field",
                    span { "Priority" }
                    select {
                        value: "{priority_value}",
                        onchange: move |evt| priority.set(TicketPriority::parse(&evt.value())),
                        for (value, label) in priority_options {
                            option { key: "{value}", value: "{value}", "{label}" }
                        }
                    }
                }

                button {
                    r#type: "button",
                    class: "button button--primary",
                    disabled: busy(),
                    onclick: submit_handler,
                    "Submit ticket"
                }

                if let Some((class_name, message)) = feedback {
                    p { class: "{class_name}", "{message}" }
                }
            }
        }
    }
}
