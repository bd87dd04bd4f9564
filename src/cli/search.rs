use crate::{cli::render, cli::session_client, warning};

pub async fn search(query: &str) {
    let query = query.trim();
    if query.is_empty() {
        warning!("Nothing to search for.");
        return;
    }

    let client = session_client().await;
    let pb = render::spinner(format!("Searching for \"{}\"...", query));
    let result = client.search(query).await;
    pb.finish_and_clear();

    match result {
        Ok(response) => render::print_search(query, &response),
        Err(e) => warning!("Search failed: {}", e),
    }
}
