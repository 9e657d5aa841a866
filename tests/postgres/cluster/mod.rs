//! Embedded `PostgreSQL` cluster shared by the repository tests.
//!
//! One cluster starts per test binary. A template database carries the
//! schema, and each test clones it into a database of its own.

mod env;
mod files;
mod worker;

use self::env::{ScopedEnv, as_overrides, bootstrap_overrides};
use self::files::{sync_password, sync_port};
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};
use eyre::{WrapErr, eyre};
use pg_embedded_setup_unpriv::worker_process_test_api::{
    WorkerOperation, WorkerRequest, WorkerRequestArgs, run as run_worker,
};
use pg_embedded_setup_unpriv::{ExecutionPrivileges, TestBootstrapSettings, bootstrap_for_tests};
use postgresql_embedded::{PostgreSQL, Status};
use rstest::fixture;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;
use tokio::runtime::Runtime;
use uuid::Uuid;

static SHARED_CLUSTER: OnceLock<ManagedCluster> = OnceLock::new();
static TEMPLATE_LOCK: Mutex<()> = Mutex::new(());

/// Handle to the cluster shared by every test in the binary.
pub type PostgresCluster = &'static ManagedCluster;

/// A running embedded cluster and whatever keeps it alive.
pub struct ManagedCluster {
    bootstrap: TestBootstrapSettings,
    env_vars: Vec<(String, Option<String>)>,
    in_process: Option<(Runtime, PostgreSQL)>,
}

impl ManagedCluster {
    fn boot() -> eyre::Result<Self> {
        let overrides = bootstrap_overrides()?;
        let scope = ScopedEnv::apply(&overrides);
        let mut bootstrap = bootstrap_for_tests()?;
        drop(scope);
        sync_password(&mut bootstrap.settings)?;
        let env_vars = bootstrap.environment.to_env();
        let mut cluster = Self {
            bootstrap,
            env_vars,
            in_process: None,
        };
        match cluster.bootstrap.privileges {
            ExecutionPrivileges::Root => cluster.start_via_worker()?,
            ExecutionPrivileges::Unprivileged => cluster.start_in_process()?,
        }
        Ok(cluster)
    }

    fn start_in_process(&mut self) -> eyre::Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let scope = ScopedEnv::apply(&as_overrides(&self.env_vars));
        let mut postgres = PostgreSQL::new(self.bootstrap.settings.clone());
        runtime.block_on(async {
            postgres.setup().await?;
            if !matches!(postgres.status(), Status::Started) {
                postgres.start().await?;
            }
            Ok::<_, postgresql_embedded::Error>(())
        })?;
        drop(scope);
        self.bootstrap.settings = postgres.settings().clone();
        sync_port(&mut self.bootstrap.settings)?;
        self.in_process = Some((runtime, postgres));
        Ok(())
    }

    fn start_via_worker(&mut self) -> eyre::Result<()> {
        self.run_worker(WorkerOperation::Setup, self.bootstrap.setup_timeout)?;
        self.run_worker(WorkerOperation::Start, self.bootstrap.start_timeout)?;
        sync_port(&mut self.bootstrap.settings)
    }

    fn stop(&mut self) -> eyre::Result<()> {
        match self.in_process.take() {
            Some((runtime, postgres)) => runtime.block_on(postgres.stop())?,
            None => self.run_worker(WorkerOperation::Stop, self.bootstrap.shutdown_timeout)?,
        }
        Ok(())
    }

    fn run_worker(&self, operation: WorkerOperation, timeout: Duration) -> eyre::Result<()> {
        let worker = self
            .bootstrap
            .worker_binary
            .as_ref()
            .ok_or_else(|| eyre!("PG_EMBEDDED_WORKER is not set for a root test run"))?;
        let args = WorkerRequestArgs {
            worker: worker.as_path(),
            settings: &self.bootstrap.settings,
            env_vars: &self.env_vars,
            operation,
            timeout,
        };
        run_worker(&WorkerRequest::new(args))?;
        Ok(())
    }

    /// Connection URL for `database` on this cluster.
    pub fn database_url(&self, database: &str) -> String {
        self.bootstrap.settings.url(database)
    }

    /// Creates `template` and runs `migrate` against it unless it exists.
    ///
    /// A failed migration drops the half-built template.
    pub fn ensure_template<F>(&self, template: &str, migrate: F) -> eyre::Result<()>
    where
        F: FnOnce(&str) -> eyre::Result<()>,
    {
        let _serialised = TEMPLATE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        if self.database_exists(template)? {
            return Ok(());
        }
        self.admin_sql(&format!("CREATE DATABASE {}", quote_identifier(template)))?;
        if let Err(err) = migrate(&self.database_url(template)) {
            self.admin_sql(&format!("DROP DATABASE {}", quote_identifier(template)))?;
            return Err(err.wrap_err(format!("cannot prepare template {template}")));
        }
        Ok(())
    }

    /// Clones `template` into a fresh database dropped with the handle.
    pub fn temporary_database(&'static self, template: &str) -> eyre::Result<TemporaryDatabase> {
        let name = format!("diaristlink_test_{}", Uuid::new_v4().simple());
        self.admin_sql(&format!(
            "CREATE DATABASE {} TEMPLATE {}",
            quote_identifier(&name),
            quote_identifier(template),
        ))?;
        Ok(TemporaryDatabase {
            url: self.database_url(&name),
            name,
            cluster: self,
        })
    }

    fn admin_sql(&self, sql: &str) -> eyre::Result<()> {
        let mut conn = self.admin_connection()?;
        diesel::sql_query(sql)
            .execute(&mut conn)
            .wrap_err_with(|| format!("admin statement failed: {sql}"))?;
        Ok(())
    }

    fn admin_connection(&self) -> eyre::Result<PgConnection> {
        Ok(PgConnection::establish(&self.database_url("postgres"))?)
    }

    fn database_exists(&self, name: &str) -> eyre::Result<bool> {
        #[derive(QueryableByName)]
        struct Exists {
            #[diesel(sql_type = Bool)]
            present: bool,
        }

        let mut conn = self.admin_connection()?;
        let row = diesel::sql_query(
            "SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1) AS present",
        )
        .bind::<Text, _>(name)
        .get_result::<Exists>(&mut conn)?;
        Ok(row.present)
    }
}

impl Drop for ManagedCluster {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            tracing::warn!(error = %err, "failed to stop embedded PostgreSQL");
        }
    }
}

/// A database cloned from a template, dropped when the handle goes away.
pub struct TemporaryDatabase {
    name: String,
    url: String,
    cluster: PostgresCluster,
}

impl TemporaryDatabase {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        let sql = format!(
            "DROP DATABASE IF EXISTS {} WITH (FORCE)",
            quote_identifier(&self.name)
        );
        if let Err(err) = self.cluster.admin_sql(&sql) {
            tracing::warn!(database = %self.name, error = %err, "failed to drop test database");
        }
    }
}

/// Provides the shared embedded cluster, starting it on first use.
///
/// # Panics
///
/// Panics when the cluster cannot start, so the failure names its cause.
#[fixture]
pub fn postgres_cluster() -> PostgresCluster {
    SHARED_CLUSTER.get_or_init(|| {
        // Booting blocks on its own runtime, which must not nest inside the
        // test's runtime.
        match std::thread::spawn(ManagedCluster::boot).join() {
            Ok(Ok(cluster)) => cluster,
            Ok(Err(err)) => panic!("SKIP-TEST-CLUSTER: failed to start PostgreSQL: {err:?}"),
            Err(_) => panic!("SKIP-TEST-CLUSTER: PostgreSQL bootstrap thread panicked"),
        }
    })
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
