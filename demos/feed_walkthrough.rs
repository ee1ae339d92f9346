use std::error::Error;

use notefeed::runner::{Options, Runner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(Options {
        skip_fetch: true,
        scrolls: 3,
        viewport_height: 12,
        ..Options::default()
    })?;
    let report = runner.run().await?;

    println!("Scrolls: {}", report.scrolls);
    println!("Appended: {}", report.appended);
    println!("Counter: {}", report.counter);
    for card in report.cards.iter() {
        println!("{} ({} rows)", card.title, card.rows());
    }

    Ok(())
}
