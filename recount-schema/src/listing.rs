use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by `<permalink>.json`.
///
/// The endpoint answers with a JSON array of listings: index 0 holds the
/// submission itself, index 1 holds the comment tree (for a comment
/// permalink, the addressed comment is its first child). Elements are kept
/// as raw values so a quirky sibling never prevents reading the one we need.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(transparent)]
pub struct ListingResponse(pub Vec<Value>);

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Listing {
    #[serde(default)]
    pub data: ListingData,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Thing {
    pub data: ThingData,
}

/// Fields of a `t1` (comment) or `t3` (link) payload that we read.
///
/// Everything is optional; unknown fields are ignored.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct ThingData {
    pub ups: Option<i64>,
    pub num_comments: Option<i64>,
}

impl ListingResponse {
    /// Decodes the listing at `index`, if present and well-formed.
    pub fn listing(&self, index: usize) -> Option<Listing> {
        let value = self.0.get(index)?;
        Listing::deserialize(value).ok()
    }

    /// Walks `response[index].data.children[0].data`.
    pub fn first_thing(&self, index: usize) -> Option<ThingData> {
        self.listing(index)?
            .data
            .children
            .into_iter()
            .next()
            .map(|thing| thing.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_thing_reads_post_listing() {
        let raw = json!([
            {
                "kind": "Listing",
                "data": {
                    "children": [
                        { "kind": "t3", "data": { "ups": 42, "num_comments": 7, "subreddit": "rust", "edited": false } }
                    ]
                }
            },
            { "kind": "Listing", "data": { "children": [] } }
        ]);
        let resp: ListingResponse = serde_json::from_value(raw).expect("array body");

        let post = resp.first_thing(0).expect("post payload");
        assert_eq!(post.ups, Some(42));
        assert_eq!(post.num_comments, Some(7));
        assert!(resp.first_thing(1).is_none());
        assert!(resp.first_thing(2).is_none());
    }

    #[test]
    fn malformed_sibling_does_not_hide_target() {
        let raw = json!([
            "not a listing",
            { "data": { "children": [ { "kind": "t1", "data": { "ups": 10, "replies": "" } } ] } }
        ]);
        let resp: ListingResponse = serde_json::from_value(raw).expect("array body");

        assert!(resp.first_thing(0).is_none());
        assert_eq!(resp.first_thing(1).and_then(|c| c.ups), Some(10));
    }

    #[test]
    fn object_body_is_not_a_listing_response() {
        let raw = json!({ "message": "Not Found", "error": 404 });
        assert!(serde_json::from_value::<ListingResponse>(raw).is_err());
    }
}
