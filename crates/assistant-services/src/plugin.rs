use crate::{DryRunSystem, HostSystem, SystemControl};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SystemBackendKind {
    Host,
    DryRun,
    #[cfg(feature = "mock")]
    Mock,
}

pub fn new_system_backend(kind: SystemBackendKind) -> Box<dyn SystemControl> {
    match kind {
        SystemBackendKind::Host => Box::new(HostSystem::new()),
        SystemBackendKind::DryRun => Box::new(DryRunSystem::new()),
        #[cfg(feature = "mock")]
        SystemBackendKind::Mock => Box::new(crate::MockSystem::new()),
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn dry_run_backend_reports_success_without_acting() {
        let system = new_system_backend(SystemBackendKind::DryRun);
        let outcome = system.shutdown(Duration::from_secs(5));
        assert!(outcome.success);
        assert_eq!(outcome.message, "System will shutdown in 5 seconds");
        assert!(system.open_application("paint").success);
    }

    #[test]
    fn mock_backend_is_selectable() {
        let system = new_system_backend(SystemBackendKind::Mock);
        assert_eq!(
            system.system_info().message,
            "System: Mock, Platform: mock-1.0"
        );
    }
}
