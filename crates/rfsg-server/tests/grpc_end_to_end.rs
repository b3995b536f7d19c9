//! Full round trips through a real gRPC client and server.

use rfsg_core::{CallAdapter, InMemorySessionRepository, ViSession};
use rfsg_driver_mock::{DriverCall, MockRfsgLibrary, StoredWaveform, INVALID_PARAMETER_ERROR};
use rfsg_proto::health::health_check_response::ServingStatus;
use rfsg_proto::health::health_client::HealthClient;
use rfsg_proto::health::HealthCheckRequest;
use rfsg_proto::nirfsg::ni_rfsg_client::NiRfsgClient;
use rfsg_proto::nirfsg::*;
use rfsg_proto::NIRFSG_SERVICE_NAME;
use rfsg_server::config::GrpcSettings;
use rfsg_server::grpc::error_mapping::{ERROR_KIND_HEADER, NI_ERROR_HEADER};
use rfsg_server::{RfsgServer, ShutdownSignal};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tonic::transport::Channel;
use tonic::Code;

const SESS_A: ViSession = 0x1000;

type ServeResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

struct Harness {
    library: Arc<MockRfsgLibrary>,
    client: NiRfsgClient<Channel>,
    channel: Channel,
    shutdown: ShutdownSignal,
    server: JoinHandle<ServeResult>,
}

async fn start() -> Harness {
    let library = Arc::new(MockRfsgLibrary::new());
    let sessions: InMemorySessionRepository = [("sessA", SESS_A)].into_iter().collect();
    let adapter = CallAdapter::new(library.clone(), Arc::new(sessions));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = RfsgServer::new(GrpcSettings::default(), adapter);
    let shutdown = server.shutdown_signal();
    let server = tokio::spawn(server.serve_on(listener));

    let channel = Channel::from_shared(format!("http://{addr}"))
        .unwrap()
        .connect()
        .await
        .unwrap();

    Harness {
        library,
        client: NiRfsgClient::new(channel.clone()),
        channel,
        shutdown,
        server,
    }
}

fn session(name: &str) -> Option<Session> {
    Some(Session {
        name: name.to_string(),
    })
}

fn f32_request(name: &str, data: Vec<f32>) -> WriteArbWaveformComplexF32Request {
    WriteArbWaveformComplexF32Request {
        vi: session(name),
        waveform_name: "wfm0".to_string(),
        wfm_data: data,
        more_data_pending: false,
    }
}

fn metadata_str<'a>(status: &'a tonic::Status, key: &str) -> Option<&'a str> {
    status.metadata().get(key).and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn f32_write_succeeds() {
    let mut h = start().await;

    let response = h
        .client
        .write_arb_waveform_complex_f32(f32_request("sessA", vec![1.0, 2.0, 3.0, 4.0]))
        .await
        .unwrap();

    assert_eq!(response.into_inner().status, 0);
    match h.library.waveform(SESS_A, "wfm0") {
        Some(StoredWaveform::F32(pairs)) => {
            assert_eq!(pairs.len(), 2);
            assert_eq!((pairs[0].re, pairs[0].im), (1.0, 2.0));
            assert_eq!((pairs[1].re, pairs[1].im), (3.0, 4.0));
        }
        other => panic!("unexpected waveform: {other:?}"),
    }
}

#[tokio::test]
async fn driver_error_carries_code_and_description() {
    let mut h = start().await;
    h.library
        .set_dynamic_message(INVALID_PARAMETER_ERROR, "Invalid parameter.");
    h.library.queue_status(INVALID_PARAMETER_ERROR);

    let status = h
        .client
        .write_arb_waveform_complex_f32(f32_request("sessA", vec![1.0, 2.0]))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Unknown);
    assert_eq!(status.message(), "Invalid parameter.");
    assert_eq!(metadata_str(&status, NI_ERROR_HEADER), Some("-1074118656"));
    assert_eq!(metadata_str(&status, ERROR_KIND_HEADER), Some("driver"));
}

#[tokio::test]
async fn raced_error_state_uses_static_description() {
    let mut h = start().await;
    h.library.set_static_message(-1_074_118_500, "The device is busy.");
    h.library.queue_status(-1_074_118_500);
    h.library
        .inject_error_race(SESS_A, INVALID_PARAMETER_ERROR, "Somebody else's failure.");

    let status = h
        .client
        .write_arb_waveform_complex_f32(f32_request("sessA", vec![1.0, 2.0]))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Unknown);
    assert_eq!(status.message(), "The device is busy.");
    assert_eq!(metadata_str(&status, NI_ERROR_HEADER), Some("-1074118500"));
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let mut h = start().await;

    let status = h
        .client
        .write_arb_waveform_complex_f32(f32_request("sessX", vec![1.0, 2.0]))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::NotFound);
    assert_eq!(metadata_str(&status, ERROR_KIND_HEADER), Some("session"));
    assert!(h.library.calls().is_empty());
}

#[tokio::test]
async fn odd_length_is_invalid_argument() {
    let mut h = start().await;

    let status = h
        .client
        .write_arb_waveform_complex_f64(WriteArbWaveformComplexF64Request {
            vi: session("sessA"),
            waveform_name: "wfm0".to_string(),
            wfm_data: vec![1.0, 2.0, 3.0],
            more_data_pending: false,
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(h.library.write_count(), 0);
}

#[tokio::test]
async fn warning_status_is_returned() {
    let mut h = start().await;
    h.library.queue_status(1_074_118_000);

    let response = h
        .client
        .write_arb_waveform_complex_i16(WriteArbWaveformComplexI16Request {
            vi: session("sessA"),
            waveform_name: "wfm0".to_string(),
            wfm_data: vec![-32768, 32767],
        })
        .await
        .unwrap();

    assert_eq!(response.into_inner().status, 1_074_118_000);
    assert!(matches!(
        h.library.calls().as_slice(),
        [DriverCall::WriteArbWaveform {
            number_of_samples: 1,
            more_data_pending: None,
            ..
        }]
    ));
}

#[tokio::test]
async fn empty_waveform_reaches_driver_with_zero_samples() {
    let mut h = start().await;

    let response = h
        .client
        .write_arb_waveform_complex_f32(f32_request("sessA", vec![]))
        .await
        .unwrap();

    assert_eq!(response.into_inner().status, 0);
    assert_eq!(
        h.library.waveform(SESS_A, "wfm0"),
        Some(StoredWaveform::F32(Vec::new()))
    );
}

#[tokio::test]
async fn concurrent_calls_share_a_session() {
    let h = start().await;

    let calls = (0..8).map(|i| {
        let mut client = h.client.clone();
        tokio::spawn(async move {
            client
                .write_arb_waveform_complex_f32(WriteArbWaveformComplexF32Request {
                    vi: session("sessA"),
                    waveform_name: format!("wfm{i}"),
                    wfm_data: vec![i as f32, 0.0],
                    more_data_pending: false,
                })
                .await
        })
    });

    for call in calls.collect::<Vec<_>>() {
        assert_eq!(call.await.unwrap().unwrap().into_inner().status, 0);
    }
    assert_eq!(h.library.write_count(), 8);
}

#[tokio::test]
async fn health_reports_serving_then_not_serving() {
    let h = start().await;
    let mut health = HealthClient::new(h.channel.clone());

    let response = health
        .check(HealthCheckRequest {
            service: NIRFSG_SERVICE_NAME.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.into_inner().status, ServingStatus::Serving as i32);

    let mut watch = health
        .watch(HealthCheckRequest {
            service: NIRFSG_SERVICE_NAME.to_string(),
        })
        .await
        .unwrap()
        .into_inner();
    let first = watch.message().await.unwrap().unwrap();
    assert_eq!(first.status, ServingStatus::Serving as i32);

    h.shutdown.trigger();

    let next = tokio::time::timeout(Duration::from_secs(5), watch.message())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(next.status, ServingStatus::NotServing as i32);
}

#[tokio::test]
async fn shutdown_stops_server() {
    let h = start().await;
    drop(h.client);
    drop(h.channel);

    h.shutdown.trigger();

    let result = tokio::time::timeout(Duration::from_secs(5), h.server)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}
