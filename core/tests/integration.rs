//! Full lifecycle tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every service over
//! real HTTP through `UreqTransport`. Validates that request building,
//! authentication and response parsing work end-to-end with the server's
//! independently written DTOs.
//!
//! Set `TELNYX_SKIP_MOCK_TESTS=1` to skip these tests where binding a local
//! port is not possible.

use std::time::Duration;

use telnyx_core::resources::calls::{CallAnswerParams, CallDialParams, CallHangupParams, RingGroupParams, RingTarget};
use telnyx_core::resources::messages::{DeliveryStatus, MessageSendParams, MessageType};
use telnyx_core::resources::number_orders::{NumberOrderCreateParams, NumberOrderStatus, OrderedNumberRequest};
use telnyx_core::resources::phone_numbers::{
    PhoneNumberFilter, PhoneNumberListParams, PhoneNumberStatus, PhoneNumberUpdateParams,
};
use telnyx_core::resources::shared::{PageParams, StringFilter};
use telnyx_core::{ApiError, ClientConfig, Nullable, TelnyxClient, UreqTransport};

/// Switches for the mock-backed tests, read from the environment.
struct MockTestConfig {
    skip: bool,
}

impl MockTestConfig {
    fn from_env() -> Self {
        let skip = std::env::var("TELNYX_SKIP_MOCK_TESTS")
            .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self { skip }
    }
}

/// Start the mock server on a random port and return its base URL.
fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client(base_url: &str) -> TelnyxClient {
    let config = ClientConfig::new("KEY_TEST")
        .with_base_url(base_url)
        .unwrap()
        .with_timeout(Duration::from_secs(5));
    TelnyxClient::new(&config).unwrap()
}

#[test]
fn call_lifecycle() {
    if MockTestConfig::from_env().skip {
        return;
    }
    let client = client(&start_mock_server());
    let calls = client.calls();

    // Step 1: dial.
    let params = CallDialParams::builder()
        .connection_id("1494404757140276705")
        .to("+18005550199")
        .from("+18005550100")
        .custom_headers(Nullable::Null)
        .build()
        .unwrap();
    let call = calls.dial(&params).unwrap().data;
    assert!(call.is_alive);
    assert!(call.client_state.is_null());
    let id = call.call_control_id.clone();

    // Step 2: status of the same call.
    let fetched = calls.retrieve_status(&id).unwrap().data;
    assert_eq!(fetched, call);

    // Step 3: answer, then ring two more destinations.
    let answered = calls
        .answer(&id, &CallAnswerParams::builder().build().unwrap())
        .unwrap();
    assert_eq!(answered.data.result, "ok");

    let targets = vec![
        RingTarget::builder().name("desk").to("+15551234567").build().unwrap(),
        RingTarget::builder().name("mobile").to("+15557654321").build().unwrap(),
    ];
    let ring = RingGroupParams::builder().targets(targets).build().unwrap();
    assert_eq!(calls.ring_group(&id, &ring).unwrap().data.result, "ok");

    // Step 4: an empty ring group is rejected with a Telnyx error document.
    let empty = ring.with_targets(Vec::new());
    match calls.ring_group(&id, &empty).unwrap_err() {
        ApiError::Status { status, errors, .. } => {
            assert_eq!(status, 422);
            assert_eq!(errors[0].code, "10015");
            assert_eq!(
                errors[0].source.as_ref().and_then(|source| source.pointer.as_deref()),
                Some("/targets")
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Step 5: hang up; the call is no longer alive.
    calls
        .hangup(&id, &CallHangupParams::builder().build().unwrap())
        .unwrap();
    assert!(!calls.retrieve_status(&id).unwrap().data.is_alive);

    // Step 6: unknown calls are NotFound.
    let err = calls.retrieve_status("v3:missing").unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn message_lifecycle() {
    if MockTestConfig::from_env().skip {
        return;
    }
    let client = client(&start_mock_server());
    let messages = client.messages();

    let params = MessageSendParams::builder()
        .to("+18665550001")
        .from("+18445550001")
        .text("Hello, World!")
        .build()
        .unwrap();
    let sent = messages.send(&params).unwrap().data;
    assert_eq!(sent.message_type, MessageType::Sms);
    assert_eq!(sent.to[0].status, DeliveryStatus::Queued);
    assert!(sent.cost.is_null());

    let fetched = messages.retrieve(&sent.id.to_string()).unwrap().data;
    assert_eq!(fetched, sent);

    let mms = params.with_media_urls(vec!["https://example.com/cat.png".to_string()]);
    assert_eq!(messages.send(&mms).unwrap().data.message_type, MessageType::Mms);

    let err = messages.send(&params.with_to("8665550001")).unwrap_err();
    assert_eq!(err.status_code(), Some(422));
}

#[test]
fn number_order_to_inventory_lifecycle() {
    if MockTestConfig::from_env().skip {
        return;
    }
    let client = client(&start_mock_server());

    // Step 1: inventory starts empty.
    let everything = PhoneNumberListParams::builder().build().unwrap();
    let page = client.phone_numbers().list(&everything).unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.meta.total_results, 0);

    // Step 2: order two numbers; the order starts pending.
    let order = NumberOrderCreateParams::builder()
        .phone_numbers(vec![
            OrderedNumberRequest::builder().phone_number("+19705555098").build().unwrap(),
            OrderedNumberRequest::builder().phone_number("+19705550100").build().unwrap(),
        ])
        .connection_id("346789098765567")
        .build()
        .unwrap();
    let created = client.number_orders().create(&order).unwrap().data;
    assert_eq!(created.status, NumberOrderStatus::Pending);
    assert!(created.customer_reference.is_null());

    // Step 3: polling settles the order.
    let settled = client.number_orders().retrieve(&created.id).unwrap().data;
    assert!(settled.is_settled());
    assert_eq!(settled.status, NumberOrderStatus::Success);

    // Step 4: filter the inventory by a contains operator.
    let filtered = everything.with_filter(
        PhoneNumberFilter::builder()
            .phone_number(StringFilter::builder().contains("5555").build().unwrap())
            .status(PhoneNumberStatus::Active)
            .build()
            .unwrap(),
    );
    let page = client.phone_numbers().list(&filtered).unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].phone_number, "+19705555098");
    let id = page.data[0].id.clone();

    // Step 5: walk pages of size one.
    let mut page_number = Some(1u32);
    let mut seen = Vec::new();
    while let Some(number) = page_number {
        let params = everything.with_page(PageParams::builder().number(number).size(1u32).build().unwrap());
        let page = client.phone_numbers().list(&params).unwrap();
        seen.extend(page.data.into_iter().map(|n| n.phone_number));
        page_number = page.meta.next_page();
    }
    seen.sort();
    assert_eq!(seen, vec!["+19705550100".to_string(), "+19705555098".to_string()]);

    // Step 6: set a reference, then clear it with an explicit null.
    let update = PhoneNumberUpdateParams::builder()
        .tags(vec!["vip".to_string()])
        .customer_reference("acct-1".to_string())
        .build()
        .unwrap();
    let updated = client.phone_numbers().update(&id, &update).unwrap().data;
    assert_eq!(updated.customer_reference, Nullable::Value("acct-1".to_string()));

    let cleared = client
        .phone_numbers()
        .update(&id, &PhoneNumberUpdateParams::builder().customer_reference(Nullable::Null).build().unwrap())
        .unwrap()
        .data;
    assert!(cleared.customer_reference.is_null());
    assert_eq!(cleared.tags, Some(vec!["vip".to_string()]));

    // Step 7: delete, then the number is gone.
    let deleted = client.phone_numbers().delete(&id).unwrap().data;
    assert_eq!(deleted.status, PhoneNumberStatus::Deleted);
    assert!(matches!(client.phone_numbers().retrieve(&id).unwrap_err(), ApiError::NotFound));
    assert!(matches!(client.phone_numbers().delete(&id).unwrap_err(), ApiError::NotFound));
}

#[test]
fn missing_credentials_are_rejected() {
    if MockTestConfig::from_env().skip {
        return;
    }
    let base_url = start_mock_server();
    let client = TelnyxClient::with_transport(&base_url, UreqTransport::new("", Duration::from_secs(5))).unwrap();

    let err = client
        .phone_numbers()
        .list(&PhoneNumberListParams::builder().build().unwrap())
        .unwrap_err();
    match err {
        ApiError::Status { status, errors, .. } => {
            assert_eq!(status, 401);
            assert_eq!(errors[0].title, "Authentication failed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
