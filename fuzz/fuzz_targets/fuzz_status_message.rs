#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Exercise the raw-byte deserialization path (includes serde_json's
    // own UTF-8 validation and error handling for invalid sequences).
    let _ = serde_json::from_slice::<bingo_client::protocol::StatusMessage>(data);

    // The lenient decoders must never panic on arbitrary text.
    if let Ok(s) = std::str::from_utf8(data) {
        let msg = serde_json::from_str::<bingo_client::protocol::StatusMessage>(s);
        if let Ok(msg) = msg {
            let _ = msg.render();
        }
        let _ = bingo_client::protocol::ColorSet::parse(s);
        let _ = bingo_client::protocol::slot_index(s);
    }
});
