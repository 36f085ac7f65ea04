use threads_auth_types::{cookie::SessionCookies, token::validate_auth_token};

use crate::domain::format::{bold, escape_html, expandable_blockquote, pre};
use crate::domain::repository::{AuthTokenRepository, SessionRepository};
use crate::domain::types::{LoginContext, OutgoingMessage, Session, User};
use crate::error::AuthServiceError;
use crate::usecase::session::SessionManager;
use crate::usecase::token::TokenLifecycle;

// ── SignIn ────────────────────────────────────────────────────────────────────

pub struct SignInInput {
    pub token: String,
    pub context: LoginContext,
}

pub struct SignInOutput {
    pub user: User,
    pub session: Session,
    /// Login alert for the user's chat. Delivery is the caller's job.
    pub notification: OutgoingMessage,
}

pub struct SignInUseCase<T, S>
where
    T: AuthTokenRepository,
    S: SessionRepository,
{
    pub tokens: TokenLifecycle<T>,
    pub sessions: SessionManager<S>,
}

impl<T, S> SignInUseCase<T, S>
where
    T: AuthTokenRepository,
    S: SessionRepository,
{
    pub async fn execute(&self, input: SignInInput) -> Result<SignInOutput, AuthServiceError> {
        // 1. Reject malformed tokens before touching the store → 400
        let token = validate_auth_token(&input.token)?;

        // 2. Consume the token → 401 if unknown, expired or already used
        let user = self
            .tokens
            .redeem(token)
            .await?
            .ok_or(AuthServiceError::InvalidOrExpiredToken)?;

        // 3. Open a session for this device
        let session = self.sessions.create(&user.id, &input.context.device).await?;

        let notification = login_notification(&user, &input.context);
        Ok(SignInOutput {
            user,
            session,
            notification,
        })
    }
}

/// "You've logged in" alert with device, IP and location in a collapsed quote.
pub fn login_notification(user: &User, context: &LoginContext) -> OutgoingMessage {
    let details = format!(
        "{}\nIP: {}\nLocation: {}",
        context.device,
        context.ip.as_deref().unwrap_or("Unknown"),
        context.location(),
    );
    let text = format!(
        "✅ {} {}!\n\n{}",
        escape_html("You've successfully logged in to"),
        bold("Threads"),
        expandable_blockquote(&pre(&details)),
    );
    OutgoingMessage::new(user.id.chat_id(), text)
}

// ── SignOut ───────────────────────────────────────────────────────────────────

pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub sessions: SessionManager<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    /// Destroy the session the cookies authenticate, if any.
    ///
    /// A cookie pair whose secret does not match leaves the stored session alone.
    pub async fn execute(&self, cookies: Option<&SessionCookies>) -> Result<bool, AuthServiceError> {
        match self.sessions.current(cookies).await? {
            Some(current) => self.sessions.destroy(current.session.id).await,
            None => Ok(false),
        }
    }
}
