use std::{net::SocketAddr, sync::mpsc};

use axum::{extract::State, routing::post, Router};
use tokio::net::TcpListener;

/// Canned master answers, keyed by XML-RPC method name.
#[derive(Clone)]
struct Responses(Vec<(&'static str, String)>);

/// A fake ROS master speaking just enough XML-RPC for the tests.
pub(crate) struct MockMaster {
    pub(crate) uri: String,
}

impl MockMaster {
    /// Serves `getSystemState` with the given subscriptions and the
    /// topic type calls with the given pairs; node and service lookups
    /// get fixed answers.
    pub(crate) fn spawn(subscriptions: &[(&str, &[&str])], topic_types: &[(&str, &str)]) -> Self {
        let system_state = triple(1, "current system state", system_state_value(subscriptions));
        let topic_types = triple(1, "current topic types", topic_types_value(topic_types));
        Self::serve(move |addr| {
            Responses(vec![
                ("getSystemState", system_state),
                ("getTopicTypes", topic_types.clone()),
                ("getPublishedTopics", topic_types),
                (
                    "getUri",
                    triple(1, "", string_value(&format!("http://{addr}"))),
                ),
                (
                    "lookupNode",
                    triple(1, "node api", string_value("http://localhost:45678")),
                ),
                (
                    "lookupService",
                    triple(-1, "no provider", string_value("")),
                ),
            ])
        })
    }

    /// A master that answers every call with an XML-RPC fault.
    pub(crate) fn spawn_faulty() -> Self {
        Self::serve(|_| Responses(Vec::new()))
    }

    fn serve(responses: impl FnOnce(SocketAddr) -> Responses + Send + 'static) -> Self {
        let (addr_sender, addr_receiver) = mpsc::channel();
        std::thread::spawn(move || {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap()
                .block_on(async move {
                    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
                        .await
                        .unwrap();
                    let addr = listener.local_addr().unwrap();
                    let app = Router::new()
                        .route("/", post(respond))
                        .with_state(responses(addr));
                    addr_sender.send(addr).unwrap();
                    axum::serve(listener, app).await.unwrap();
                });
        });
        let addr = addr_receiver.recv().unwrap();
        Self {
            uri: format!("http://{addr}"),
        }
    }
}

async fn respond(State(responses): State<Responses>, body: String) -> String {
    for (method, response) in &responses.0 {
        if body.contains(&format!("<methodName>{method}</methodName>")) {
            return response.clone();
        }
    }
    fault()
}

fn system_state_value(subscriptions: &[(&str, &[&str])]) -> String {
    let subscribers = subscriptions
        .iter()
        .map(|(topic, nodes)| {
            array_value(vec![
                string_value(topic),
                array_value(nodes.iter().map(|node| string_value(node)).collect()),
            ])
        })
        .collect();
    array_value(vec![
        array_value(vec![]),
        array_value(subscribers),
        array_value(vec![]),
    ])
}

fn topic_types_value(topic_types: &[(&str, &str)]) -> String {
    array_value(
        topic_types
            .iter()
            .map(|(topic, msg_type)| array_value(vec![string_value(topic), string_value(msg_type)]))
            .collect(),
    )
}

fn triple(code: i32, message: &str, value: String) -> String {
    let payload = array_value(vec![
        format!("<value><int>{code}</int></value>"),
        string_value(message),
        value,
    ]);
    format!(
        "<?xml version=\"1.0\"?><methodResponse><params><param>{payload}</param></params></methodResponse>"
    )
}

fn string_value(text: &str) -> String {
    format!("<value><string>{text}</string></value>")
}

fn array_value(children: Vec<String>) -> String {
    format!(
        "<value><array><data>{}</data></array></value>",
        children.concat()
    )
}

fn fault() -> String {
    "<?xml version=\"1.0\"?><methodResponse><fault><value><struct>\
     <member><name>faultCode</name><value><int>-1</int></value></member>\
     <member><name>faultString</name><value><string>unknown method</string></value></member>\
     </struct></value></fault></methodResponse>"
        .to_owned()
}
