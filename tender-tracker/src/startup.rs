use std::{sync::Arc, time::Duration};

use snafu::ResultExt;
use tender_core::{GeoPoint, VesselId, Waypoint, WaypointSource, Waypoints};
use tokio::{io::AsyncRead, sync::watch};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::{
    consumer::Consumer,
    error::{
        Result,
        error::{CoreSnafu, JoinSnafu},
    },
    fleet::Fleet,
    hub::{FixHub, MarkerBoard},
    pier::{ConfiguredPier, PierClient},
    poller::{Poller, SensorClient},
    settings::{Environment, FeedSettings, Settings},
    streamer::FixStreamClient,
};

// If the backend is unresponsive we do not want to relentlessly spam it.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

pub struct App {
    fleet: Fleet,
    hub: FixHub,
    board: MarkerBoard,
    consumer: Consumer,
    feed: Option<Feed>,
    cancel: CancellationToken,
}

enum Feed {
    Stream(FixStreamClient),
    Polling(Poller),
}

impl App {
    pub async fn build(settings: Settings) -> Result<App> {
        let pier = resolve_pier(&settings).await?;
        let waypoints = Arc::new(watch::Sender::new(Waypoints {
            ship: None,
            pier: pier.map(Waypoint::pier),
        }));

        let vessels: Vec<VesselId> = settings.vessels().map(|v| v.id.clone()).collect();
        let hub = FixHub::new(vessels.clone()).with_ship_waypoint(
            settings.ship.id.clone(),
            settings.ship.name.clone(),
            waypoints.clone(),
        );
        let board = MarkerBoard::new(vessels);
        let fleet = Fleet::new(&settings, waypoints, Arc::new(board.clone()));

        let feed = match (settings.environment, &settings.feed) {
            (Environment::Test, _) | (_, None) => None,
            (_, Some(FeedSettings::Stream { url })) => {
                Some(Feed::Stream(FixStreamClient::new(url.clone())))
            }
            (_, Some(FeedSettings::Polling { url, interval })) => {
                let vessels = settings
                    .vessels()
                    .filter_map(|v| v.mmsi.map(|mmsi| (mmsi, v.id.clone())))
                    .collect();
                Some(Feed::Polling(Poller::new(
                    SensorClient::new(url.clone()),
                    *interval,
                    vessels,
                )))
            }
        };

        Ok(App {
            fleet,
            hub,
            board,
            consumer: Consumer::new(),
            feed,
            cancel: CancellationToken::new(),
        })
    }

    pub fn markers(&self) -> MarkerBoard {
        self.board.clone()
    }

    pub fn hub(&self) -> FixHub {
        self.hub.clone()
    }

    pub fn waypoints(&self) -> watch::Receiver<Waypoints> {
        self.fleet.waypoints()
    }

    /// Cancelling the token stops every marker and makes [`App::run`] return.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run(self) -> Result<()> {
        let App {
            fleet,
            hub,
            consumer,
            feed,
            cancel,
            ..
        } = self;

        let mut markers = fleet.spawn(&hub, &cancel).context(CoreSnafu)?;

        tokio::select! {
            res = tokio::signal::ctrl_c() => match res {
                Ok(()) => info!("received shutdown signal"),
                Err(e) => error!("failed to listen for shutdown signal: {e:?}"),
            },
            _ = cancel.cancelled() => {}
            _ = run_feed(feed, &consumer, &hub) => {}
        }

        cancel.cancel();
        while let Some(res) = markers.join_next().await {
            res.context(JoinSnafu)?;
        }

        info!("shut down");
        Ok(())
    }

    /// Runs the markers with `source` in place of the configured feed. Returns the consumer
    /// result once the token is cancelled and all markers have stopped.
    pub async fn run_test(self, source: impl AsyncRead + Unpin) -> Result<()> {
        let App {
            fleet,
            hub,
            consumer,
            cancel,
            ..
        } = self;

        let mut markers = fleet.spawn(&hub, &cancel).context(CoreSnafu)?;

        let res = tokio::select! {
            res = consumer.run(source, &hub) => res,
            _ = cancel.cancelled() => Ok(()),
        };

        cancel.cancelled().await;
        while let Some(join) = markers.join_next().await {
            join.context(JoinSnafu)?;
        }

        res
    }
}

async fn run_feed(feed: Option<Feed>, consumer: &Consumer, hub: &FixHub) {
    match feed {
        None => futures::future::pending::<()>().await,
        Some(Feed::Polling(poller)) => poller.run(hub).await,
        Some(Feed::Stream(client)) => loop {
            if let Err(e) = stream_once(&client, consumer, hub).await {
                error!("fix stream failed: {e:?}");
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
        },
    }
}

#[instrument(skip_all)]
async fn stream_once(client: &FixStreamClient, consumer: &Consumer, hub: &FixHub) -> Result<()> {
    let source = client.streamer().await?;
    consumer.run(source, hub).await
}

async fn resolve_pier(settings: &Settings) -> Result<Option<GeoPoint>> {
    let source: Box<dyn WaypointSource> = match (&settings.pier, &settings.pier_url) {
        (Some(pier), _) => Box::new(ConfiguredPier(Some(pier.position().context(CoreSnafu)?))),
        (None, Some(url)) => Box::new(PierClient::new(url.clone())),
        (None, None) => Box::new(ConfiguredPier(None)),
    };

    match source.pier().await {
        Ok(Some(pier)) => {
            info!(%pier, "pier location resolved");
            Ok(Some(pier))
        }
        Ok(None) => {
            warn!("no pier location, tender destinations will not be estimated");
            Ok(None)
        }
        Err(e) => {
            error!("failed to fetch pier location: {e:?}");
            Ok(None)
        }
    }
}
