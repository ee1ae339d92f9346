use std::error::Error;

use notefeed::fetch;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let endpoint = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8000/".to_string());

    let url = fetch::notes_url(&endpoint)?;
    let client = fetch::build_client(None, Some(5), false, None)?;
    let notes = fetch::fetch_notes(&client, &url).await?;

    println!("Notes: {}", notes.len());
    for note in notes.iter() {
        println!(
            "[{}] {} (deadline {})",
            note.mode, note.content, note.dead_line
        );
    }

    Ok(())
}
