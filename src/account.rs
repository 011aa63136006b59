use tracing::{debug, info};

use crate::error::ApiError;
use crate::models::{ImageSource, ImageUpload, PasswordChange, ProfileUpdate};
use crate::shell::{PageContext, Route};
use crate::validate;

pub const UPDATED: &str = "Updated";
pub const DUPLICATE_NICKNAME: &str = "*Nickname already taken.";

pub struct EditProfileForm {
    ctx: PageContext,
    email: String,
    nickname: String,
    profile_image: Option<ImageUpload>,
    /// Current picture from the server; `None` keeps the grey placeholder.
    avatar: Option<ImageSource>,
    nickname_helper: Option<String>,
    submit_enabled: bool,
    delete_modal_open: bool,
}

impl EditProfileForm {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            email: String::new(),
            nickname: String::new(),
            profile_image: None,
            avatar: None,
            nickname_helper: None,
            submit_enabled: false,
            delete_modal_open: false,
        }
    }

    pub async fn load(&mut self) {
        let user = match self.ctx.backend.current_user().await {
            Ok(u) => u,
            Err(e) => {
                self.ctx.report_failure("load profile", &e, "Failed to load your profile.");
                return;
            }
        };
        self.email = user.email.unwrap_or_default();
        self.nickname = user.nickname.unwrap_or_default();

        match self.ctx.backend.my_profile_image().await {
            Ok(img) => self.avatar = Some(ImageSource::Fetched(img)),
            Err(e) => debug!("no profile picture: {e}"),
        }
        self.validate();
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn avatar(&self) -> Option<&ImageSource> {
        self.avatar.as_ref()
    }

    pub fn nickname_helper(&self) -> Option<&str> {
        self.nickname_helper.as_deref()
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn is_delete_modal_open(&self) -> bool {
        self.delete_modal_open
    }

    pub fn set_nickname(&mut self, v: impl Into<String>) {
        self.nickname = v.into();
        self.validate();
    }

    pub fn set_profile_image(&mut self, upload: ImageUpload) {
        self.profile_image = Some(upload);
    }

    fn validate(&mut self) {
        let v = validate::profile_nickname(&self.nickname);
        self.nickname_helper = (!v.ok).then_some(v.reason);
        self.submit_enabled = v.ok;
    }

    pub async fn submit(&mut self) -> bool {
        self.validate();
        if !self.submit_enabled {
            return false;
        }
        let req = ProfileUpdate {
            nickname: self.nickname.trim().to_string(),
            profile_image: self.profile_image.clone(),
        };
        match self.ctx.backend.update_profile(req).await {
            Ok(()) => {
                info!("profile updated");
                self.ctx.shell.toast(UPDATED);
                true
            }
            Err(ApiError::BadRequest { .. }) => {
                self.nickname_helper = Some(DUPLICATE_NICKNAME.into());
                false
            }
            Err(e) => {
                self.ctx.report_failure("update profile", &e, "Failed to update your profile.");
                false
            }
        }
    }

    pub fn request_delete_account(&mut self) {
        self.delete_modal_open = true;
    }

    pub fn cancel_delete(&mut self) {
        self.delete_modal_open = false;
    }

    pub fn dismiss_modal_outside(&mut self) {
        self.cancel_delete();
    }

    /// The modal closes whatever the outcome.
    pub async fn confirm_delete_account(&mut self) {
        if !self.delete_modal_open {
            return;
        }
        let result = self.ctx.backend.delete_account().await;
        self.delete_modal_open = false;
        match result {
            Ok(()) => {
                info!("account deleted");
                self.ctx.shell.alert("Your account has been deleted.");
                self.ctx.shell.navigate(Route::Login);
            }
            Err(e) => self.ctx.report_failure("delete account", &e, "Failed to delete your account."),
        }
    }

    pub fn go_back(&self) {
        self.ctx.shell.navigate(Route::Posts);
    }
}

pub struct EditPasswordForm {
    ctx: PageContext,
    password: String,
    password_confirm: String,
    password_helper: Option<String>,
    confirm_helper: Option<String>,
    form_helper: Option<String>,
    submit_enabled: bool,
}

impl EditPasswordForm {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            password: String::new(),
            password_confirm: String::new(),
            password_helper: None,
            confirm_helper: None,
            form_helper: None,
            submit_enabled: false,
        }
    }

    pub fn set_password(&mut self, v: impl Into<String>) {
        self.password = v.into();
        self.validate();
    }

    pub fn set_password_confirm(&mut self, v: impl Into<String>) {
        self.password_confirm = v.into();
        self.validate();
    }

    fn validate(&mut self) {
        self.form_helper = None;
        let pw = if self.password.is_empty() {
            validate::Validation::fail("Please enter a password.")
        } else {
            validate::password(&self.password)
        };
        let confirm = validate::password_confirm(&self.password, &self.password_confirm);
        self.password_helper = (!pw.ok).then(|| pw.reason.clone());
        self.confirm_helper = (!confirm.ok).then(|| confirm.reason.clone());
        self.submit_enabled = pw.ok && confirm.ok;
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn password_helper(&self) -> Option<&str> {
        self.password_helper.as_deref()
    }

    pub fn confirm_helper(&self) -> Option<&str> {
        self.confirm_helper.as_deref()
    }

    pub fn form_helper(&self) -> Option<&str> {
        self.form_helper.as_deref()
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub async fn submit(&mut self) -> bool {
        self.validate();
        if !self.submit_enabled {
            return false;
        }
        let req = PasswordChange {
            password: self.password.clone(),
            password_confirm: self.password_confirm.clone(),
        };
        match self.ctx.backend.change_password(&req).await {
            Ok(()) => {
                self.password.clear();
                self.password_confirm.clear();
                self.validate();
                self.ctx.shell.toast(UPDATED);
                true
            }
            Err(e @ (ApiError::Unauthorized | ApiError::Transport(_))) => {
                self.ctx.report_failure(
                    "change password",
                    &e,
                    "Something went wrong while changing the password.",
                );
                false
            }
            Err(e) => {
                self.form_helper = Some(
                    e.server_message()
                        .unwrap_or("Failed to change the password.")
                        .to_string(),
                );
                false
            }
        }
    }

    pub fn go_back(&self) {
        self.ctx.shell.navigate(Route::Posts);
    }
}
