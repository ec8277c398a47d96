//! Authentication API client methods

use super::{ApiClient, ClientError};
use catalog_core::{LoginForm, RegisterForm, TokenResponse, User};
use reqwest::Method;

impl ApiClient {
    /// Exchange credentials for an access token (`POST /login`)
    pub async fn login(&self, form: &LoginForm) -> Result<TokenResponse, ClientError> {
        let request = self.request(Method::POST, "/login").json(form);
        self.execute(request).await
    }

    /// Create an account and receive its access token (`POST /register`)
    pub async fn register(&self, form: &RegisterForm) -> Result<TokenResponse, ClientError> {
        let request = self.request(Method::POST, "/register").json(form);
        self.execute(request).await
    }

    /// Profile of the account the attached token belongs to (`GET /me`)
    pub async fn me(&self) -> Result<User, ClientError> {
        let request = self.request(Method::GET, "/me");
        self.execute(request).await
    }

    /// Tell the backend the session is over (`POST /logout`)
    pub async fn logout(&self) -> Result<(), ClientError> {
        let request = self.request(Method::POST, "/logout");
        self.execute_empty(request).await
    }
}
