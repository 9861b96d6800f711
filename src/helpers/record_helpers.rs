use serde::Serializer;
use surrealdb::RecordId;

pub const SONG_TABLE: &str = "song";
pub const USER_TABLE: &str = "user";
pub const ARTIST_REQUEST_TABLE: &str = "artist_request";
pub const PLAYLIST_TABLE: &str = "playlist";
pub const ALBUM_TABLE: &str = "album";

/// Accepts both `table:key` and bare `key` forms and returns the key.
pub fn parse_id_part(id: &str) -> &str {
    if let Some(id_part) = id.split(':').nth(1) {
        id_part
    } else {
        id
    }
}

pub fn create_record_id(table: &str, id: &str) -> RecordId {
    let clean_id = parse_id_part(id.trim());
    RecordId::from_table_key(table, clean_id)
}

pub fn create_song_id(song_id: &str) -> RecordId {
    create_record_id(SONG_TABLE, song_id)
}

pub fn create_user_id(user_id: &str) -> RecordId {
    create_record_id(USER_TABLE, user_id)
}

pub fn create_artist_request_id(request_id: &str) -> RecordId {
    create_record_id(ARTIST_REQUEST_TABLE, request_id)
}

pub fn create_playlist_id(playlist_id: &str) -> RecordId {
    create_record_id(PLAYLIST_TABLE, playlist_id)
}

pub fn create_album_id(album_id: &str) -> RecordId {
    create_record_id(ALBUM_TABLE, album_id)
}

/// The bare key of a record id, as exposed to API clients.
pub fn record_key(id: &RecordId) -> String {
    let full = id.to_string();
    parse_id_part(&full)
        .trim_start_matches(['⟨', '`'])
        .trim_end_matches(['⟩', '`'])
        .to_string()
}

// Outbound JSON renders record links as plain keys.

pub fn serialize_record_id<S: Serializer>(id: &RecordId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&record_key(id))
}

pub fn serialize_record_ids<S: Serializer>(
    ids: &[RecordId],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(ids.iter().map(record_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_part() {
        assert_eq!(parse_id_part("user:123"), "123");
        assert_eq!(parse_id_part("123"), "123");
        assert_eq!(parse_id_part("song:abc_def"), "abc_def");
    }

    #[test]
    fn test_create_record_ids() {
        let song = create_song_id("song:abc123");
        assert_eq!(song.table(), "song");
        assert_eq!(record_key(&song), "abc123");

        let user = create_user_id("xyz");
        assert_eq!(user.table(), "user");
        assert_eq!(record_key(&user), "xyz");

        let request = create_artist_request_id(" req1 ");
        assert_eq!(request.table(), "artist_request");
        assert_eq!(record_key(&request), "req1");
    }

    #[test]
    fn test_serialize_helpers() {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(serialize_with = "serialize_record_id")]
            id: RecordId,
            #[serde(serialize_with = "serialize_record_ids")]
            likes: Vec<RecordId>,
        }

        let json = serde_json::to_value(Wrapper {
            id: create_song_id("s1"),
            likes: vec![create_user_id("u1"), create_user_id("u2")],
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "id": "s1", "likes": ["u1", "u2"] })
        );
    }
}
