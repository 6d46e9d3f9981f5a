use uuid::Uuid;

pub const ROOM_ID_PREFIX: &str = "room-";
const ROOM_ID_SUFFIX_LEN: usize = 8;

/// Generates a short room id that `is_taken` does not reject.
pub fn generate_room_id(is_taken: impl Fn(&str) -> bool) -> String {
    loop {
        let token = Uuid::new_v4().simple().to_string();
        let candidate = format!("{ROOM_ID_PREFIX}{}", &token[..ROOM_ID_SUFFIX_LEN]);
        if !is_taken(&candidate) {
            return candidate;
        }
    }
}
