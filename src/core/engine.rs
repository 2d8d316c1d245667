use crate::core::migrator::Migrator;
use crate::domain::model::{MigrationReport, PlannedMigration};
use crate::domain::ports::{DestinationApi, SourceApi, Storage};
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::monitor::RunMonitor;

pub struct MigrationEngine<Src: SourceApi, Dst: DestinationApi, St: Storage> {
    migrator: Migrator<Src, Dst, St>,
    #[cfg(feature = "cli")]
    monitor: RunMonitor,
}

impl<Src: SourceApi, Dst: DestinationApi, St: Storage> MigrationEngine<Src, Dst, St> {
    pub fn new(migrator: Migrator<Src, Dst, St>) -> Self {
        Self {
            migrator,
            #[cfg(feature = "cli")]
            monitor: RunMonitor::default(),
        }
    }

    #[cfg(feature = "cli")]
    pub fn new_with_monitoring(migrator: Migrator<Src, Dst, St>, enabled: bool) -> Self {
        Self {
            migrator,
            monitor: RunMonitor::new(enabled),
        }
    }

    fn log_stats(&self, _phase: &str) {
        #[cfg(feature = "cli")]
        self.monitor.log_stats(_phase);
    }

    /// Checks both services, then migrates every source assistant.
    /// Only a failed connectivity check is returned as an error.
    pub async fn run(&self) -> Result<MigrationReport> {
        tracing::info!("Starting assistant migration");

        self.migrator.check_connections().await?;
        self.log_stats("Connectivity check");

        let report = self.migrator.migrate_all_report().await;
        self.log_stats("Migration");

        tracing::info!(
            "Migration completed: {} migrated, {} failed",
            report.mapping.len(),
            report.failed.len()
        );
        #[cfg(feature = "cli")]
        self.monitor.log_final_stats();

        Ok(report)
    }

    pub async fn plan(&self) -> Result<Vec<PlannedMigration>> {
        tracing::info!("🔍 DRY RUN MODE - nothing will be uploaded or created");

        self.migrator.check_connections().await?;
        let plan = self.migrator.plan_all().await;
        self.log_stats("Planning");

        Ok(plan)
    }
}
