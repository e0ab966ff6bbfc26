use cacm_desa_core::auth::ObfuscationKeys;
use cacm_desa_core::{
    AdminCredentialValidator, DispatchEngine, DocumentationService, FindingAggregator, FlagTypeCatalog,
    IdentificationTrigger, MobileCredentialValidator, PeriodManager, ScopeResolver, VillagePortal,
};
use cacm_desa_db::repository::{LegacyLoginProcedure, RedFlagProcedures};
use cacm_desa_db::unit_of_work::UnitOfWork;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Args;
use crate::session::{SessionError, SessionIssuer};

/// Runtime settings the handlers need, separated from the CLI so tests can
/// build them directly.
#[derive(Clone)]
pub struct Settings {
    pub admin_secret: String,
    pub mobile_secret: String,
    pub admin_session_lifetime: Duration,
    pub mobile_session_lifetime: Duration,
    pub keys: ObfuscationKeys,
    pub procedure_timeout: Duration,
    pub secure_cookies: bool,
}

impl From<&Args> for Settings {
    fn from(args: &Args) -> Self {
        Self {
            admin_secret: args.admin_auth_secret.clone(),
            mobile_secret: args.mobile_auth_secret.clone(),
            admin_session_lifetime: args.admin_session_lifetime(),
            mobile_session_lifetime: args.mobile_session_lifetime(),
            keys: ObfuscationKeys {
                user_key: args.encrypt_user_key.clone(),
                password_key: args.encrypt_pwd_key.clone(),
            },
            procedure_timeout: args.procedure_timeout(),
            secure_cookies: args.secure_cookies,
        }
    }
}

/// Shared application state. Every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub admin_sessions: SessionIssuer,
    pub mobile_sessions: SessionIssuer,
    pub scopes: ScopeResolver,
    pub admin_auth: AdminCredentialValidator,
    pub mobile_auth: MobileCredentialValidator,
    pub periods: PeriodManager,
    pub identification: IdentificationTrigger,
    pub documentation: DocumentationService,
    pub dispatch: DispatchEngine,
    pub aggregator: FindingAggregator,
    pub village: VillagePortal,
}

impl AppState {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        red_flags: Arc<dyn RedFlagProcedures>,
        login: Arc<dyn LegacyLoginProcedure>,
        settings: Settings,
    ) -> Result<Self, SessionError> {
        let admin_lifetime = chrono::Duration::from_std(settings.admin_session_lifetime)
            .map_err(|e| SessionError::Config(format!("admin session lifetime: {e}")))?;
        let timeout = settings.procedure_timeout;

        Ok(Self {
            admin_sessions: SessionIssuer::admin(
                settings.admin_secret,
                settings.admin_session_lifetime,
                settings.secure_cookies,
            )?,
            mobile_sessions: SessionIssuer::mobile(
                settings.mobile_secret,
                settings.mobile_session_lifetime,
                settings.secure_cookies,
            )?,
            scopes: ScopeResolver::new(uow.clone()),
            admin_auth: AdminCredentialValidator::new(uow.clone(), admin_lifetime),
            mobile_auth: MobileCredentialValidator::new(login, settings.keys, timeout),
            periods: PeriodManager::new(uow.clone(), FlagTypeCatalog::default()),
            identification: IdentificationTrigger::new(uow.clone(), red_flags.clone(), timeout),
            documentation: DocumentationService::new(uow.clone()),
            dispatch: DispatchEngine::new(uow.clone()),
            aggregator: FindingAggregator::new(uow.clone()),
            village: VillagePortal::new(uow, red_flags, timeout),
        })
    }
}
