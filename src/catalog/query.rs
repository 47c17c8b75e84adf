//! GraphQL query construction and response normalization.
//!
//! The catalog answers with Relay-style connections
//! (`posts.edges[].node`, `topics.edges[].node`). This module flattens them
//! into [`Record`]s, rejecting the whole response on any deviation.

use super::error::FetchError;
use crate::models::Record;
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroU32;

/// Build the query for the top `limit` posts ranked by votes.
pub fn top_posts_query(limit: NonZeroU32) -> String {
    format!(
        r#"{{
  posts(order: VOTES, first: {}) {{
    edges {{
      node {{
        name
        tagline
        votesCount
        commentsCount
        topics {{
          edges {{
            node {{
              name
            }}
          }}
        }}
      }}
    }}
  }}
}}"#,
        limit
    )
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: PostsData,
}

#[derive(Debug, Deserialize)]
struct PostsData {
    posts: Connection<PostNode>,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostNode {
    name: String,
    tagline: String,
    votes_count: u64,
    comments_count: u64,
    topics: Connection<TopicNode>,
}

#[derive(Debug, Deserialize)]
struct TopicNode {
    name: String,
}

impl From<PostNode> for Record {
    fn from(node: PostNode) -> Self {
        Record {
            name: node.name,
            tagline: node.tagline,
            upvotes: node.votes_count,
            comments: node.comments_count,
            tags: node
                .topics
                .edges
                .into_iter()
                .map(|edge| edge.node.name)
                .collect(),
        }
    }
}

/// Parse a response body into records, in the order the service sent them.
pub fn parse_posts(body: &str) -> Result<Vec<Record>, FetchError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::Schema(format!("malformed JSON: {}", e)))?;

    let envelope: Envelope = match Envelope::deserialize(&value) {
        Ok(envelope) => envelope,
        Err(e) => {
            return Err(match first_graphql_error(&value) {
                Some(message) => {
                    FetchError::Schema(format!("{} (GraphQL error: {})", e, message))
                }
                None => FetchError::Schema(e.to_string()),
            });
        }
    };

    let records: Vec<Record> = envelope
        .data
        .posts
        .edges
        .into_iter()
        .map(|edge| Record::from(edge.node))
        .collect();

    if let Some(position) = records.iter().position(|r| r.name.is_empty()) {
        return Err(FetchError::Schema(format!(
            "post at position {} has an empty name",
            position
        )));
    }

    Ok(records)
}

/// First `errors[].message` of a GraphQL response, if any.
fn first_graphql_error(value: &Value) -> Option<&str> {
    value
        .get("errors")?
        .as_array()?
        .first()?
        .get("message")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn limit(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_query_contains_limit_and_order() {
        let query = top_posts_query(limit(25));
        assert!(query.contains("posts(order: VOTES, first: 25)"));
        assert!(query.contains("votesCount"));
        assert!(query.contains("commentsCount"));
        assert!(query.contains("topics"));
    }

    #[test]
    fn test_parse_posts() {
        let body = json!({
            "data": {"posts": {"edges": [
                {"node": {
                    "name": "Alpha",
                    "tagline": "",
                    "votesCount": 120,
                    "commentsCount": 7,
                    "topics": {"edges": [
                        {"node": {"name": "AI"}},
                        {"node": {"name": "Tech"}},
                        {"node": {"name": "AI"}}
                    ]}
                }}
            ]}}
        })
        .to_string();

        let records = parse_posts(&body).unwrap();
        assert_eq!(
            records,
            vec![Record {
                name: "Alpha".to_string(),
                tagline: String::new(),
                upvotes: 120,
                comments: 7,
                tags: vec!["AI".to_string(), "Tech".to_string(), "AI".to_string()],
            }]
        );
    }

    #[test]
    fn test_parse_empty_edges() {
        let body = json!({"data": {"posts": {"edges": []}}}).to_string();
        assert!(parse_posts(&body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_posts("{not json").unwrap_err();
        assert!(matches!(err, FetchError::Schema(ref m) if m.starts_with("malformed JSON")));
    }

    #[test]
    fn test_parse_null_field_rejected() {
        let body = json!({
            "data": {"posts": {"edges": [
                {"node": {
                    "name": "Alpha",
                    "tagline": null,
                    "votesCount": 1,
                    "commentsCount": 0,
                    "topics": {"edges": []}
                }}
            ]}}
        })
        .to_string();

        assert!(matches!(parse_posts(&body), Err(FetchError::Schema(_))));
    }

    #[test]
    fn test_parse_negative_count_rejected() {
        let body = json!({
            "data": {"posts": {"edges": [
                {"node": {
                    "name": "Alpha",
                    "tagline": "x",
                    "votesCount": -4,
                    "commentsCount": 0,
                    "topics": {"edges": []}
                }}
            ]}}
        })
        .to_string();

        assert!(matches!(parse_posts(&body), Err(FetchError::Schema(_))));
    }

    #[test]
    fn test_parse_graphql_error_is_reported() {
        let body = json!({
            "data": null,
            "errors": [{"message": "invalid_oauth_token"}]
        })
        .to_string();

        let err = parse_posts(&body).unwrap_err();
        assert!(err.to_string().contains("invalid_oauth_token"));
    }
}
