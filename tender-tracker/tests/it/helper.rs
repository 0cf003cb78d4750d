use std::time::Duration;

use futures::{Future, TryStreamExt};
use tender_core::{GeoPoint, MarkerView, VesselFix, VesselId};
use tender_tracker::{
    hub::MarkerBoard,
    models::FixRecord,
    settings::{Environment, LogLevel, Settings, VesselSettings, WaypointSettings},
    startup::App,
};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

pub const PIER: GeoPoint = GeoPoint::new(43.2951, 5.3625);

pub struct TestHelper {
    pub fix_source: FixSource,
    pub markers: MarkerBoard,
    cancel: CancellationToken,
}

pub struct FixSource {
    out: tokio::sync::mpsc::Sender<Result<String, std::io::Error>>,
}

pub fn ship() -> VesselId {
    VesselId::from("ship")
}

pub fn tender3() -> VesselId {
    VesselId::from("tender3")
}

pub fn tender4() -> VesselId {
    VesselId::from("tender4")
}

pub fn test_settings() -> Settings {
    let vessel = |id: &str, name: &str| VesselSettings {
        id: VesselId::from(id),
        name: name.to_string(),
        mmsi: None,
    };

    Settings {
        log_level: LogLevel::Debug,
        environment: Environment::Test,
        tick_rate_hz: 50,
        stale_after: None,
        timezone: chrono_tz::UTC,
        ship: vessel("ship", "Evrima"),
        tenders: vec![vessel("tender3", "Tender 3"), vessel("tender4", "Tender 4")],
        pier: Some(WaypointSettings {
            latitude: PIER.latitude,
            longitude: PIER.longitude,
        }),
        pier_url: None,
        feed: None,
    }
}

pub async fn test<T, Fut>(test_closure: T)
where
    T: FnOnce(TestHelper) -> Fut,
    Fut: Future<Output = ()>,
{
    test_with_settings(test_settings(), test_closure).await
}

pub async fn test_with_settings<T, Fut>(settings: Settings, test_closure: T)
where
    T: FnOnce(TestHelper) -> Fut,
    Fut: Future<Output = ()>,
{
    let app = App::build(settings).await.unwrap();
    let markers = app.markers();
    let cancel = app.cancellation();

    let (sender, recv) = tokio::sync::mpsc::channel(100);

    let receiver_stream = ReceiverStream::new(recv);
    let compat =
        tokio_util::compat::FuturesAsyncReadCompatExt::compat(receiver_stream.into_async_read());

    let handle = tokio::spawn(app.run_test(compat));

    let helper = TestHelper {
        fix_source: FixSource { out: sender },
        markers,
        cancel: cancel.clone(),
    };

    test_closure(helper).await;

    cancel.cancel();
    // The source is closed by the time the closure returns, so the consumer reports it.
    let _ = handle.await.unwrap();
}

impl TestHelper {
    /// Waits until the marker of `vessel` shows a view matching `predicate`.
    pub async fn wait_for_view(
        &self,
        vessel: &VesselId,
        predicate: impl Fn(&MarkerView) -> bool,
    ) -> MarkerView {
        let mut rx = self.markers.watch(vessel).unwrap();
        let view = tokio::time::timeout(
            WAIT_TIMEOUT,
            rx.wait_for(|v| v.as_ref().is_some_and(&predicate)),
        )
        .await
        .unwrap()
        .unwrap();

        view.clone().unwrap()
    }

    pub async fn wait_for_removal(&self, vessel: &VesselId) {
        let mut rx = self.markers.watch(vessel).unwrap();
        tokio::time::timeout(WAIT_TIMEOUT, rx.wait_for(|v| v.is_none()))
            .await
            .unwrap()
            .unwrap();
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl FixSource {
    pub async fn send_fix(&self, vessel: &VesselId, fix: &VesselFix) {
        self.send_record(&FixRecord::from_fix(vessel, fix)).await
    }

    pub async fn send_record(&self, record: &FixRecord) {
        let string = serde_json::to_string(record).unwrap();
        self.send_string(string).await
    }

    pub async fn send_string(&self, mut val: String) {
        val.push('\n');
        self.out.send(Ok(val)).await.unwrap();
    }
}
