use dioxus::prelude::*;

use crate::core::auth::{validate_login, validate_registration, AuthClient, Registration};
use crate::core::platform;
use crate::core::session::Session;
use crate::core::status::{begin_if_idle, ActionStatus};

#[component]
pub fn Login() -> Element {
    let mut registering = use_signal(|| false);
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut cellphone = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut status = use_signal(ActionStatus::default);
    let mut busy = use_signal(|| false);

    let session_ctx: Option<Signal<Session>> = try_use_context::<Signal<Session>>();

    let feedback = match &status() {
        ActionStatus::Idle => None,
        ActionStatus::Working(label) => {
            Some(("auth-panel__meta".to_string(), format!("{label}…")))
        }
        ActionStatus::Done(message) => Some((
            "auth-panel__meta auth-panel__meta--success".to_string(),
            format!("✅ {message}"),
        )),
        ActionStatus::Error(err) => Some((
            "auth-panel__meta auth-panel__meta--error".to_string(),
            format!("⚠️ {err}"),
        )),
    };

    let sign_in = move |_| {
        if !busy.with_mut(begin_if_idle) {
            return;
        }
        let email_value = email().trim().to_string();
        let password_value = password();
        if let Err(problem) = validate_login(&email_value, &password_value) {
            status.set(ActionStatus::Error(problem));
            busy.set(false);
            return;
        }
        status.set(ActionStatus::Working("Signing in"));
        platform::spawn_future(async move {
            match AuthClient::from_env()
                .login(&email_value, &password_value)
                .await
            {
                Ok(token) => {
                    // The route guard reads the session and moves the user
                    // off the login view on the next render.
                    if let Some(mut session) = session_ctx {
                        session.write().begin(token);
                    }
                    status.set(ActionStatus::Done("Signed in.".to_string()));
                }
                Err(err) => status.set(ActionStatus::Error(err.to_string())),
            }
            busy.set(false);
        });
    };

    let register = move |_| {
        if !busy.with_mut(begin_if_idle) {
            return;
        }
        let registration = Registration {
            name: name().trim().to_string(),
            email: email().trim().to_string(),
            cellphone: cellphone().trim().to_string(),
            password: password(),
        };
        if let Err(problem) = validate_registration(&registration, &confirm()) {
            status.set(ActionStatus::Error(problem));
            busy.set(false);
            return;
        }
        status.set(ActionStatus::Working("Creating the account"));
        platform::spawn_future(async move {
            match AuthClient::from_env().register(&registration).await {
                Ok(()) => {
                    registering.set(false);
                    name.set(String::new());
                    cellphone.set(String::new());
                    password.set(String::new());
                    confirm.set(String::new());
                    status.set(ActionStatus::Done(
                        "Account created. Sign in with your new credentials.".to_string(),
                    ));
                }
                Err(err) => status.set(ActionStatus::Error(err.to_string())),
            }
            busy.set(false);
        });
    };

    let toggle = move |_| {
        registering.set(!registering());
        status.set(ActionStatus::Idle);
    };

    let heading = if registering() {
        "Create an account"
    } else {
        "Sign in"
    };
    let toggle_label = if registering() {
        "Back to sign in"
    } else {
        "Need an account? Register"
    };

    rsx! {
        section { class: "page page-login",
            div { class: "auth-panel",
                h1 { "{heading}" }

                if registering() {
                    label { class: "auth-panel__field",
                        span { "Name" }
                        input {
                            r#type: "text",
                            value: "{name}",
                            oninput: move |evt| name.set(evt.value()),
                        }
                    }
                }

                label { class: "auth-panel__field",
                    span { "Email" }
                    input {
                        r#type: "email",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }

                if registering() {
                    label { class: "auth-panel__field",
                        span { "Cellphone" }
                        input {
                            r#type: "tel",
                            value: "{cellphone}",
                            oninput: move |evt| cellphone.set(evt.value()),
                        }
                    }
                }

                label { class: "auth-panel__field",
                    span { "Password" }
                    input {
                        r#type: "password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }

                if registering() {
                    label { class: "auth-panel__field",
                        span { "Confirm password" }
                        input {
                            r#type: "password",
                            value: "{confirm}",
                            oninput: move |evt| confirm.set(evt.value()),
                        }
                    }
                }

                if registering() {
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        disabled: busy(),
                        onclick: register,
                        "Create account"
                    }
                } else {
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        disabled: busy(),
                        onclick: sign_in,
                        "Sign in"
                    }
                }

                button {
                    r#type: "button",
                    class: "button button--ghost",
                    disabled: busy(),
                    onclick: toggle,
                    "{toggle_label}"
                }

                if let Some((class_name, message)) = feedback {
                    p { class: "{class_name}", "{message}" }
                }
            }
        }
    }
}
