use cdpt_types::{ChatHistory, ChatMessage};
use proptest::prelude::*;

fn message_strategy() -> impl Strategy<Value = ChatMessage> {
    (
        prop_oneof![Just("user"), Just("bot")],
        "[a-z ]{0,12}",
        proptest::option::of(-1_000i64..1_000_000),
    )
        .prop_map(|(role, content, timestamp)| {
            let message = ChatMessage::new(role, content);
            match timestamp {
                Some(ts) => message.with_timestamp(ts),
                None => message,
            }
        })
}

proptest! {
    #[test]
    fn sorted_history_is_non_increasing(messages in prop::collection::vec(message_strategy(), 0..40)) {
        let history = ChatHistory::new(messages).sorted_newest_first();
        for pair in history.messages().windows(2) {
            prop_assert!(pair[0].sort_key() >= pair[1].sort_key());
        }
    }

    #[test]
    fn sorting_keeps_every_message(messages in prop::collection::vec(message_strategy(), 0..40)) {
        let sorted = ChatHistory::new(messages.clone()).sorted_newest_first();
        prop_assert_eq!(sorted.len(), messages.len());
        for message in &messages {
            let expected = messages.iter().filter(|m| *m == message).count();
            let found = sorted.messages().iter().filter(|m| *m == message).count();
            prop_assert_eq!(expected, found);
        }
    }
}

#[test]
fn json_bytes_round_trip_preserves_order() {
    let history = ChatHistory::new(vec![
        ChatMessage::new("user", "hi").with_timestamp(100),
        ChatMessage::new("bot", "hello").with_timestamp(200),
    ]);

    let bytes = history.to_json_bytes().unwrap();
    assert_eq!(
        std::str::from_utf8(&bytes).unwrap(),
        r#"[{"role":"user","content":"hi","timestamp":100},{"role":"bot","content":"hello","timestamp":200}]"#
    );
    assert_eq!(ChatHistory::from_json_slice(&bytes).unwrap(), history);
}
