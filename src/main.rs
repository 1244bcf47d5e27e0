fn main() -> anyhow::Result<()> {
    slipway::pipeline::run()?;
    Ok(())
}
