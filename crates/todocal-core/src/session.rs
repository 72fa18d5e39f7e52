use serde::Serialize;
use tracing::{debug, info};

use crate::error::Rejection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
  #[default]
  SignedOut,
  SignedIn,
}

/// Which flavour of the credential form is shown. Both accept the same
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
  #[default]
  SignIn,
  SignUp,
}

impl AuthMode {
  pub fn toggled(self) -> Self {
    match self {
      Self::SignIn => Self::SignUp,
      Self::SignUp => Self::SignIn,
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      Self::SignIn => "Sign In",
      Self::SignUp => "Create Account",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Self::SignIn => "Enter your credentials to access your tasks",
      Self::SignUp => "Enter your details to create a new account",
    }
  }

  pub fn toggle_label(self) -> &'static str {
    match self {
      Self::SignIn => "Don't have an account? Sign up",
      Self::SignUp => "Already have an account? Sign in",
    }
  }
}

/// Stub sign-in gate. Any non-empty email and password pair gets in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionGate {
  state: SessionState,
  mode: AuthMode,
}

impl SessionGate {
  pub fn state(&self) -> SessionState {
    self.state
  }

  pub fn is_signed_in(&self) -> bool {
    self.state == SessionState::SignedIn
  }

  pub fn mode(&self) -> AuthMode {
    self.mode
  }

  pub fn submit_credentials(&mut self, email: &str, password: &str) -> Result<(), Rejection> {
    if self.is_signed_in() {
      return Err(Rejection::AlreadySignedIn);
    }
    if email.trim().is_empty() || password.trim().is_empty() {
      debug!(mode = ?self.mode, "credentials rejected");
      return Err(Rejection::InvalidCredentials);
    }

    info!(mode = ?self.mode, "signed in");
    self.state = SessionState::SignedIn;
    // The form starts over in sign-in mode next time it is shown.
    self.mode = AuthMode::SignIn;
    Ok(())
  }

  pub fn toggle_mode(&mut self) -> Result<AuthMode, Rejection> {
    if self.is_signed_in() {
      return Err(Rejection::AlreadySignedIn);
    }
    self.mode = self.mode.toggled();
    Ok(self.mode)
  }

  pub fn sign_out(&mut self) -> Result<(), Rejection> {
    if !self.is_signed_in() {
      return Err(Rejection::NotSignedIn);
    }
    info!("signed out");
    self.state = SessionState::SignedOut;
    Ok(())
  }
}
