#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let _rocket = webtag_api::rocket().await?.launch().await?;
    Ok(())
}
