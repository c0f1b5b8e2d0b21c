//! Behaviour-driven tests for the end-to-end random user pipeline.

use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use random_user_etl::domain::ports::PipelineRun;
use random_user_etl::domain::{PipelineError, RandomUserPipeline, RunResult, RunState};
use random_user_etl::outbound::persistence::{DbPool, DieselRandomUserRepository, PoolConfig};
use random_user_etl::outbound::random_user::RandomUserHttpSource;
use reqwest::Url;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::{Value, json};
use tokio::runtime::Runtime;

#[path = "support/pg_embed.rs"]
mod pg_embed;

mod support;

use pg_embed::test_cluster;
use support::{handle_cluster_setup_failure, reset_database, stored_row_count};

const TEST_DB: &str = "random_user_pipeline_bdd";

type Pipeline = RandomUserPipeline<RandomUserHttpSource, DieselRandomUserRepository>;

#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

#[derive(Clone)]
struct ClusterHandle(#[expect(dead_code, reason = "keeps the cluster alive")] Arc<TestCluster>);

#[derive(Clone)]
struct ServerHandle(Arc<MockServer>);

#[derive(Default, ScenarioState)]
struct PipelineWorld {
    runtime: Slot<RuntimeHandle>,
    _cluster: Slot<ClusterHandle>,
    database_url: Slot<String>,
    server: Slot<ServerHandle>,
    pipeline: Slot<Arc<Pipeline>>,
    last_result: Slot<RunResult>,
    setup_error: Slot<String>,
}

fn user_json(index: usize) -> Value {
    let gender = if index % 2 == 0 { "female" } else { "male" };
    json!({
        "gender": gender,
        "name": { "title": "Mx", "first": format!("First{index}"), "last": format!("Last{index}") },
        "location": { "city": "Bristol", "country": "United Kingdom" },
        "email": format!("user{index}@example.com"),
        "login": { "uuid": format!("00000000-0000-4000-8000-{index:012}") },
        "dob": { "date": "1990-01-01T00:00:00.000Z", "age": 34 }
    })
}

impl PipelineWorld {
    fn setup_database(&self) {
        let runtime = match Runtime::new() {
            Ok(runtime) => runtime,
            Err(error) => {
                self.setup_error.set(error.to_string());
                return;
            }
        };
        let setup = test_cluster().and_then(|cluster| {
            reset_database(&cluster, TEST_DB)?;
            Ok(cluster)
        });
        match setup {
            Ok(cluster) => {
                self.database_url
                    .set(cluster.connection().database_url(TEST_DB));
                self._cluster.set(ClusterHandle(Arc::new(cluster)));
                self.runtime.set(RuntimeHandle(Arc::new(runtime)));
            }
            Err(reason) => {
                let _: Option<()> = handle_cluster_setup_failure(&reason);
                self.setup_error.set(reason);
            }
        }
    }

    fn is_skipped(&self) -> bool {
        self.setup_error.get().is_some()
    }

    fn serve(&self, status: u16, body: Value) {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/").query_param("results", "50");
            then.status(status).json_body(body);
        });
        self.server.set(ServerHandle(Arc::new(server)));
    }

    fn pipeline(&self) -> Arc<Pipeline> {
        if let Some(pipeline) = self.pipeline.get() {
            return pipeline;
        }
        let runtime = self.runtime.get().expect("runtime");
        let server = self.server.get().expect("mock server");
        let database_url = self.database_url.get().expect("database url");

        let endpoint = Url::parse(&server.0.url("/api/")).expect("mock endpoint");
        let source =
            RandomUserHttpSource::new(endpoint, Duration::from_secs(5)).expect("http source");
        let pool = runtime
            .0
            .block_on(DbPool::new(PoolConfig::new(database_url)))
            .expect("create pool");
        let pipeline = Arc::new(RandomUserPipeline::new(
            Arc::new(source),
            Arc::new(DieselRandomUserRepository::new(pool)),
            Arc::new(DefaultClock),
        ));
        self.pipeline.set(Arc::clone(&pipeline));
        pipeline
    }

    fn run(&self) {
        if self.is_skipped() {
            return;
        }
        let runtime = self.runtime.get().expect("runtime");
        let pipeline = self.pipeline();
        let result = runtime.0.block_on(pipeline.run());
        self.last_result.set(result);
    }

    fn result(&self) -> RunResult {
        self.last_result.get().expect("run result should be set")
    }
}

#[fixture]
fn world() -> PipelineWorld {
    PipelineWorld::default()
}

#[given("an empty destination database")]
fn an_empty_destination_database(world: &PipelineWorld) {
    world.setup_database();
}

#[given("a user API serving {count} users")]
fn a_user_api_serving_users(world: &PipelineWorld, count: usize) {
    let users: Vec<Value> = (0..count).map(user_json).collect();
    world.serve(200, json!({ "results": users, "info": { "results": count } }));
}

#[given("a user API failing with status {status}")]
fn a_user_api_failing_with_status(world: &PipelineWorld, status: u16) {
    world.serve(status, json!({ "error": "service unavailable" }));
}

#[when("the pipeline runs")]
fn the_pipeline_runs(world: &PipelineWorld) {
    world.run();
}

#[when("the pipeline runs again")]
fn the_pipeline_runs_again(world: &PipelineWorld) {
    world.run();
}

#[then("the run succeeds with {count} new users")]
fn the_run_succeeds_with_new_users(world: &PipelineWorld, count: u64) {
    if world.is_skipped() {
        eprintln!("SKIP-TEST-CLUSTER: scenario skipped");
        return;
    }
    let summary = world.result().expect("run should succeed");
    assert_eq!(summary.inserted_count, count);
}

#[then("the run fails while extracting with status {status}")]
fn the_run_fails_while_extracting(world: &PipelineWorld, status: u16) {
    if world.is_skipped() {
        eprintln!("SKIP-TEST-CLUSTER: scenario skipped");
        return;
    }
    let failure = world.result().expect_err("run should fail");
    assert_eq!(failure.failed_in, RunState::Extracting);
    assert!(matches!(
        failure.error,
        PipelineError::SourceUnavailable { .. }
    ));
    assert_eq!(failure.error.status(), Some(status));
}

#[then("the database holds {count} users")]
fn the_database_holds_users(world: &PipelineWorld, count: i64) {
    if world.is_skipped() {
        eprintln!("SKIP-TEST-CLUSTER: scenario skipped");
        return;
    }
    let database_url = world.database_url.get().expect("database url");
    assert_eq!(stored_row_count(&database_url).expect("row count"), count);
}

#[scenario(
    path = "tests/features/random_user_pipeline.feature",
    name = "Rerunning the pipeline on the same batch inserts nothing new"
)]
fn rerunning_the_pipeline_inserts_nothing_new(world: PipelineWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/random_user_pipeline.feature",
    name = "An unavailable user API fails the run before loading"
)]
fn an_unavailable_user_api_fails_the_run(world: PipelineWorld) {
    drop(world);
}
