//! crates/reskick_core/src/auth_gate.rs
//!
//! The sign-in / sign-up modal.

use std::sync::Arc;

use crate::domain::{Session, MIN_PASSWORD_CHARS};
use crate::notify::{Notifier, Toast};
use crate::ports::AuthService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn title(&self) -> &'static str {
        match self {
            Self::SignIn => "Đăng nhập",
            Self::SignUp => "Đăng ký",
        }
    }

    /// The prompt next to the mode toggle link.
    pub fn switch_prompt(&self) -> &'static str {
        match self {
            Self::SignIn => "Chưa có tài khoản?",
            Self::SignUp => "Đã có tài khoản?",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Sign-in succeeded; the modal closed.
    SignedIn(Session),
    /// The account was created and waits for email confirmation.
    SignedUp,
    /// The form was rejected locally or by the auth service.
    Failed(String),
}

pub struct AuthGate {
    auth: Arc<dyn AuthService>,
    notifier: Arc<dyn Notifier>,
    email_redirect_to: Option<String>,
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    open: bool,
    loading: bool,
}

impl AuthGate {
    /// `email_redirect_to` is the address confirmation emails link back to,
    /// normally the application's own origin.
    pub fn new(
        auth: Arc<dyn AuthService>,
        notifier: Arc<dyn Notifier>,
        email_redirect_to: Option<String>,
    ) -> Self {
        Self {
            auth,
            notifier,
            email_redirect_to,
            mode: AuthMode::default(),
            email: String::new(),
            password: String::new(),
            open: false,
            loading: false,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// The same checks the form inputs enforce before submission.
    fn validate(&self) -> Result<(), String> {
        if self.email.trim().is_empty() {
            return Err("Vui lòng nhập email.".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(format!(
                "Mật khẩu phải có ít nhất {} ký tự.",
                MIN_PASSWORD_CHARS
            ));
        }
        Ok(())
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        if let Err(message) = self.validate() {
            return SubmitOutcome::Failed(message);
        }

        self.loading = true;
        let email = self.email.trim().to_string();
        let outcome = match self.mode {
            AuthMode::SignUp => self
                .auth
                .sign_up(&email, &self.password, self.email_redirect_to.as_deref())
                .await
                .map(|_| {
                    self.notifier.notify(
                        Toast::info("Đăng ký thành công!")
                            .with_description("Kiểm tra email để xác nhận tài khoản nhé."),
                    );
                    SubmitOutcome::SignedUp
                }),
            AuthMode::SignIn => self.auth.sign_in(&email, &self.password).await.map(|session| {
                self.notifier.notify(Toast::info("Đăng nhập thành công! 🎉"));
                SubmitOutcome::SignedIn(session)
            }),
        };
        self.loading = false;

        match outcome {
            Ok(outcome) => {
                if matches!(outcome, SubmitOutcome::SignedIn(_)) {
                    self.open = false;
                }
                outcome
            }
            Err(e) => {
                let message = e.user_message();
                self.notifier.notify(Toast::error("Lỗi", message.clone()));
                SubmitOutcome::Failed(message)
            }
        }
    }
}
