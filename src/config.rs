/// Server settings shared with handlers through `web::Data`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Secret used to verify the JWT carried by the auth cookie.
    pub secret: String,
    /// Login page of the external auth service; unauthenticated users are
    /// redirected here.
    pub auth_service_url: String,
}
