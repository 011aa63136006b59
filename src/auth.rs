use tracing::{info, warn};

use crate::models::{ImageUpload, LoginRequest, Signup};
use crate::shell::{PageContext, Route};
use crate::validate::{self, Validation};

pub const PASSWORD_HELPER: &str =
    "8 to 20 characters with an uppercase letter, a lowercase letter, a digit and a special character.";

/// What sits under the password field on the login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordHint {
    /// Nothing typed yet.
    Hidden,
    Error(String),
    /// Input passes; the policy reminder is shown.
    Helper,
}

pub struct LoginForm {
    ctx: PageContext,
    email: String,
    password: String,
    email_error: Option<String>,
    password_hint: PasswordHint,
    submit_enabled: bool,
}

impl LoginForm {
    pub fn new(ctx: PageContext) -> Self {
        let mut form = Self {
            ctx,
            email: String::new(),
            password: String::new(),
            email_error: None,
            password_hint: PasswordHint::Hidden,
            submit_enabled: false,
        };
        form.update_validation();
        form
    }

    pub fn set_email(&mut self, v: impl Into<String>) {
        self.email = v.into();
        self.update_validation();
    }

    pub fn set_password(&mut self, v: impl Into<String>) {
        self.password = v.into();
        self.update_validation();
    }

    fn update_validation(&mut self) {
        let email = validate::email(&self.email);
        let pw = validate::password(&self.password);

        // errors only once the user has typed something
        self.email_error = (!email.ok && !self.email.is_empty()).then(|| email.reason.clone());
        self.password_hint = if self.password.is_empty() {
            PasswordHint::Hidden
        } else if !pw.ok {
            PasswordHint::Error(pw.reason.clone())
        } else {
            PasswordHint::Helper
        };
        self.submit_enabled = email.ok && pw.ok;
    }

    pub fn email_error(&self) -> Option<&str> {
        self.email_error.as_deref()
    }

    pub fn password_hint(&self) -> &PasswordHint {
        &self.password_hint
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    /// Returns true once logged in (and navigated to the list).
    pub async fn submit(&mut self) -> bool {
        self.update_validation();
        if !self.submit_enabled {
            return false;
        }
        let req = LoginRequest { email: self.email.trim().to_string(), password: self.password.clone() };
        match self.ctx.backend.login(&req).await {
            Ok(()) => {
                info!("logged in");
                self.ctx.shell.navigate(Route::Posts);
                true
            }
            Err(e) => {
                warn!("login failed: {e}");
                self.ctx.shell.alert("Login failed: check your email and password.");
                false
            }
        }
    }

    pub fn go_signup(&self) {
        self.ctx.shell.navigate(Route::Signup);
    }
}

/// Helper text for a field that stays quiet while empty.
fn quiet_when_empty(raw: &str, v: &Validation) -> Option<String> {
    (!raw.is_empty() && !v.ok).then(|| v.reason.clone())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupHelpers {
    pub profile: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
    pub nickname: Option<String>,
}

pub struct SignupForm {
    ctx: PageContext,
    email: String,
    password: String,
    password_confirm: String,
    nickname: String,
    profile_image: Option<ImageUpload>,
    helpers: SignupHelpers,
    submit_enabled: bool,
}

impl SignupForm {
    pub fn new(ctx: PageContext) -> Self {
        let mut form = Self {
            ctx,
            email: String::new(),
            password: String::new(),
            password_confirm: String::new(),
            nickname: String::new(),
            profile_image: None,
            helpers: SignupHelpers {
                profile: Some("Please add a profile picture.".into()),
                ..Default::default()
            },
            submit_enabled: false,
        };
        form.validate();
        form
    }

    pub fn set_email(&mut self, v: impl Into<String>) {
        self.email = v.into();
        self.validate();
    }

    pub fn set_password(&mut self, v: impl Into<String>) {
        self.password = v.into();
        self.validate();
    }

    pub fn set_password_confirm(&mut self, v: impl Into<String>) {
        self.password_confirm = v.into();
        self.validate();
    }

    pub fn set_nickname(&mut self, v: impl Into<String>) {
        self.nickname = v.into();
        self.validate();
    }

    /// Picking a picture clears the profile helper; the picture stays optional.
    pub fn set_profile_image(&mut self, upload: ImageUpload) {
        self.profile_image = Some(upload);
        self.helpers.profile = None;
    }

    fn validate(&mut self) {
        let email = validate::email(&self.email);
        let pw = validate::password(&self.password);
        let confirm = validate::password_confirm(&self.password, &self.password_confirm);
        let nick = validate::signup_nickname(&self.nickname);

        self.helpers.email = quiet_when_empty(self.email.trim(), &email);
        self.helpers.password = quiet_when_empty(&self.password, &pw);
        self.helpers.password_confirm = quiet_when_empty(&self.password_confirm, &confirm);
        self.helpers.nickname = quiet_when_empty(self.nickname.trim(), &nick);
        self.submit_enabled = email.ok && pw.ok && confirm.ok && nick.ok;
    }

    pub fn helpers(&self) -> &SignupHelpers {
        &self.helpers
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub async fn submit(&mut self) -> bool {
        self.validate();
        if !self.submit_enabled {
            self.ctx.shell.alert("Please check your input.");
            return false;
        }
        let req = Signup {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            nickname: self.nickname.trim().to_string(),
            profile_image: self.profile_image.clone(),
        };
        info!(email = %req.email, has_image = req.profile_image.is_some(), "signup");
        match self.ctx.backend.signup(req).await {
            Ok(()) => {
                self.ctx.shell.alert("Signup complete. Taking you to the login page.");
                self.ctx.shell.navigate(Route::Login);
                true
            }
            Err(e) => {
                self.ctx.report_failure("signup", &e, "Signup failed.");
                false
            }
        }
    }

    pub fn go_login(&self) {
        self.ctx.shell.navigate(Route::Login);
    }
}
