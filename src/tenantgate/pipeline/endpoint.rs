//! Named API endpoints and how the pipeline treats them.

/// Administrative switch consulted before any hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    None,
    /// `server.api.userAPI.<method>`
    UserApi,
    /// `server.api.userAPI.patchPassword`
    UserPatchPassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    /// Requests and responses are also appended to the security log.
    pub security_sensitive: bool,
    pub guard: Guard,
}

impl Endpoint {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            security_sensitive: false,
            guard: Guard::None,
        }
    }

    #[must_use]
    pub const fn security_sensitive(mut self) -> Self {
        self.security_sensitive = true;
        self
    }

    #[must_use]
    pub const fn guarded(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }
}

pub const GET_ORGS: Endpoint = Endpoint::new("getOrgs");
pub const GET_ORG: Endpoint = Endpoint::new("getOrg");
pub const GET_PROJECTS: Endpoint = Endpoint::new("getProjects");
pub const GET_PROJECT: Endpoint = Endpoint::new("getProject");
pub const WHOAMI: Endpoint = Endpoint::new("whoami")
    .security_sensitive()
    .guarded(Guard::UserApi);
pub const GET_USERS: Endpoint = Endpoint::new("getUsers")
    .security_sensitive()
    .guarded(Guard::UserApi);
pub const GET_USER: Endpoint = Endpoint::new("getUser")
    .security_sensitive()
    .guarded(Guard::UserApi);

/// Endpoints served by the router.
pub const ENDPOINTS: &[Endpoint] = &[
    GET_ORGS,
    GET_ORG,
    GET_PROJECTS,
    GET_PROJECT,
    WHOAMI,
    GET_USERS,
    GET_USER,
];
