use tracing::{debug, error};

use crate::images;
use crate::models::ImageSource;
use crate::shell::{PageContext, Route};

/// Where a document-level click landed, relative to the header widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Menu,
    HeaderProfile,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    EditProfile,
    EditPassword,
    Logout,
}

/// Avatar + nickname in the top bar with its single dropdown menu.
pub struct HeaderWidget {
    ctx: PageContext,
    avatar: ImageSource,
    nickname: Option<String>,
    menu_open: bool,
    /// Mirrors the document click listener: only registered while the menu is open.
    outside_listener: bool,
}

impl HeaderWidget {
    pub fn new(ctx: PageContext) -> Self {
        let avatar = ImageSource::Default(ctx.config.default_avatar.clone());
        Self { ctx, avatar, nickname: None, menu_open: false, outside_listener: false }
    }

    pub async fn load(&mut self) {
        self.load_avatar().await;
        self.load_nickname().await;
    }

    pub async fn load_avatar(&mut self) {
        let result = self.ctx.backend.my_profile_image().await;
        self.avatar = images::or_default(result, &self.ctx.config.default_avatar);
    }

    pub async fn load_nickname(&mut self) {
        match self.ctx.backend.current_user().await {
            Ok(user) => {
                if let Some(n) = user.nickname.filter(|n| !n.is_empty()) {
                    self.nickname = Some(n);
                }
            }
            Err(e) => debug!("header nickname unavailable: {e}"),
        }
    }

    pub fn avatar(&self) -> &ImageSource {
        &self.avatar
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn is_listening_outside(&self) -> bool {
        self.outside_listener
    }

    /// Click on the header avatar.
    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
        self.outside_listener = self.menu_open;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
        self.outside_listener = false;
    }

    /// Document-level click. Ignored unless the listener is armed.
    pub fn document_click(&mut self, target: ClickTarget) {
        if self.outside_listener && target == ClickTarget::Outside {
            self.close_menu();
        }
    }

    pub async fn select(&mut self, action: MenuAction) {
        self.close_menu();
        match action {
            MenuAction::EditProfile => self.ctx.shell.navigate(Route::EditProfile),
            MenuAction::EditPassword => self.ctx.shell.navigate(Route::EditPassword),
            MenuAction::Logout => logout(&self.ctx).await,
        }
    }
}

/// POST logout, then go to login whatever the outcome.
pub async fn logout(ctx: &PageContext) {
    if let Err(e) = ctx.backend.logout().await {
        error!("logout failed: {e}");
    }
    ctx.shell.navigate(Route::Login);
}
