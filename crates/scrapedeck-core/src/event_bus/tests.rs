use super::*;

#[tokio::test]
async fn test_publish_and_subscribe() {
    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();

    let delivered = bus.publish(InteractionEvent::ResponsePending {
        agent_id: "agent-1".to_string(),
    });
    assert_eq!(delivered, 1);

    let event = rx.recv().await.unwrap();
    assert_eq!(event.agent_id(), "agent-1");
}

#[tokio::test]
async fn test_publish_without_subscribers_is_dropped() {
    let bus = EventBus::new(16);
    let delivered = bus.publish(InteractionEvent::ResponseCancelled {
        agent_id: "agent-1".to_string(),
    });
    assert_eq!(delivered, 0);
}

#[tokio::test]
async fn test_multiple_subscribers_each_receive() {
    let bus = EventBus::new(16);
    let mut a = bus.subscribe();
    let mut b = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 2);

    bus.publish(InteractionEvent::MessageSent {
        agent_id: "agent-2".to_string(),
        message_id: 7,
    });

    for rx in [&mut a, &mut b] {
        let event = rx.recv().await.unwrap();
        assert_eq!(event.agent_id(), "agent-2");
    }
}

#[test]
fn test_choice_selected_notice() {
    let event = InteractionEvent::ChoiceSelected {
        agent_id: "agent-1".to_string(),
        message_id: 3,
        key: "choice_2".to_string(),
    };
    assert_eq!(event.notice().unwrap(), "Selected: choice_2");

    let event = InteractionEvent::ResponsePending {
        agent_id: "agent-1".to_string(),
    };
    assert!(event.notice().is_none());
}

#[test]
fn test_event_serializes_tagged() {
    let event = InteractionEvent::ResponseArrived {
        agent_id: "agent-1".to_string(),
        message_id: 3,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "response_arrived");
    assert_eq!(json["message_id"], 3);
}
