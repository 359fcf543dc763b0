use sqlgate_common::{AccessError, HttpMethod, Interface, ReadOnlyReason, Settings};

use crate::context::Context;

/// Central read-only / DDL check for statements that do not check themselves.
///
/// Read-only wins over DDL-prohibited. Settings are read once per call.
pub fn check_access(context: &Context) -> Result<(), AccessError> {
    check_access_with(
        &context.settings(),
        context.client_interface(),
        context.client_http_method(),
    )
}

pub(crate) fn check_access_with(
    settings: &Settings,
    interface: Interface,
    http_method: HttpMethod,
) -> Result<(), AccessError> {
    if settings.readonly.is_readonly() {
        let reason = if interface == Interface::Http && http_method == HttpMethod::Get {
            ReadOnlyReason::HttpGet
        } else {
            ReadOnlyReason::Session
        };
        return Err(AccessError::readonly(reason));
    }

    if !settings.allow_ddl {
        return Err(AccessError::DdlProhibited);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use sqlgate_common::{ClientInfo, ReadonlyLevel};

    use super::*;

    fn level() -> impl Strategy<Value = ReadonlyLevel> {
        prop_oneof![
            Just(ReadonlyLevel::Disabled),
            Just(ReadonlyLevel::Absolute),
            Just(ReadonlyLevel::AllowSettings),
        ]
    }

    fn interface() -> impl Strategy<Value = Interface> {
        prop_oneof![
            Just(Interface::Native),
            Just(Interface::Http),
            Just(Interface::Other),
        ]
    }

    fn http_method() -> impl Strategy<Value = HttpMethod> {
        prop_oneof![
            Just(HttpMethod::Unknown),
            Just(HttpMethod::Get),
            Just(HttpMethod::Post),
        ]
    }

    #[test]
    fn test_unrestricted_session_passes() {
        assert_eq!(check_access(&Context::default()), Ok(()));
    }

    #[test]
    fn test_http_get_reason() {
        let ctx = Context::new(Settings::readonly())
            .with_client_info(ClientInfo::http(HttpMethod::Get, "web"));
        match check_access(&ctx) {
            Err(AccessError::ReadOnly {
                reason: ReadOnlyReason::HttpGet,
            }) => {}
            other => panic!("Expected HTTP GET readonly, got {:?}", other),
        }
    }

    #[test]
    fn test_http_post_gets_session_reason() {
        let ctx = Context::new(Settings::readonly())
            .with_client_info(ClientInfo::http(HttpMethod::Post, "web"));
        match check_access(&ctx) {
            Err(AccessError::ReadOnly {
                reason: ReadOnlyReason::Session,
            }) => {}
            other => panic!("Expected session readonly, got {:?}", other),
        }
    }

    #[test]
    fn test_ddl_prohibited() {
        let ctx = Context::new(Settings::default().with_allow_ddl(false));
        assert_eq!(check_access(&ctx), Err(AccessError::DdlProhibited));
    }

    #[test]
    fn test_readonly_wins_over_ddl() {
        let ctx = Context::new(Settings::readonly().with_allow_ddl(false));
        assert!(matches!(
            check_access(&ctx),
            Err(AccessError::ReadOnly { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_gate_decision_table(
            level in level(),
            allow_ddl in any::<bool>(),
            interface in interface(),
            method in http_method(),
        ) {
            let settings = Settings::default().with_readonly(level).with_allow_ddl(allow_ddl);
            let result = check_access_with(&settings, interface, method);

            if level.is_readonly() {
                let expected = if interface == Interface::Http && method == HttpMethod::Get {
                    ReadOnlyReason::HttpGet
                } else {
                    ReadOnlyReason::Session
                };
                prop_assert_eq!(result, Err(AccessError::readonly(expected)));
            } else if !allow_ddl {
                prop_assert_eq!(result, Err(AccessError::DdlProhibited));
            } else {
                prop_assert_eq!(result, Ok(()));
            }
        }

        #[test]
        fn prop_gate_is_idempotent(
            level in level(),
            allow_ddl in any::<bool>(),
            interface in interface(),
            method in http_method(),
        ) {
            let ctx = Context::new(Settings::default().with_readonly(level).with_allow_ddl(allow_ddl))
                .with_client_info(ClientInfo {
                    interface,
                    http_method: method,
                    user: "default".to_string(),
                });
            prop_assert_eq!(check_access(&ctx), check_access(&ctx));
        }
    }
}
