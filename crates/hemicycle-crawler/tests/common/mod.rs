#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use hemicycle_crawler::{HarvestError, HttpClient, HttpResponse, ResponseFuture};

/// Serves canned responses and answers 404 for anything else.
#[derive(Default)]
pub struct MockClient {
    responses: HashMap<String, HttpResponse>,
    unreachable: Vec<String>,
    requests: RefCell<Vec<String>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(mut self, url: &str, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), response(200, "text/html; charset=utf-8", body));
        self
    }

    pub fn xml(mut self, url: &str, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), response(200, "application/xml", body));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), response(status, "text/html", ""));
        self
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.push(url.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|u| *u == url).count()
    }
}

impl HttpClient for MockClient {
    fn get<'a>(&'a self, url: &'a str) -> ResponseFuture<'a> {
        self.requests.borrow_mut().push(url.to_string());
        let res = if self.unreachable.iter().any(|u| u == url) {
            Err(HarvestError::Network {
                url: url.to_string(),
                reason: "connection refused".into(),
            })
        } else {
            Ok(self
                .responses
                .get(url)
                .cloned()
                .unwrap_or_else(|| response(404, "text/html", "Not Found")))
        };
        Box::pin(async move { res })
    }
}

fn response(status: u16, content_type: &str, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        content_type: Some(content_type.to_string()),
        body: body.as_bytes().to_vec(),
    }
}

pub fn toc_page(next: Option<&str>) -> String {
    match next {
        Some(href) => format!(
            r#"<html><body><h1>Inhoud</h1>
            <a href="index.html" title="Vorige">Vorige</a>
            <a href="{href}" title="Volgende">Volgende</a></body></html>"#
        ),
        None => String::from("<html><body><h1>Inhoud</h1></body></html>"),
    }
}

pub fn document(text: &str) -> String {
    format!(r#"<html lang="nl"><body><p>{text}</p></body></html>"#)
}
