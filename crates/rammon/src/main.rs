use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "sim".to_string());

    match mode.as_str() {
        "sim" => {
            let bind_addr = args
                .next()
                .unwrap_or_else(|| rammon::DEFAULT_BIND_ADDR.to_string());
            let image_path = args.next().unwrap_or_default();
            let image = if image_path.is_empty() {
                log::info!("no memory image given, emulated memory starts zeroed");
                None
            } else {
                log::info!("loading memory image '{}'", image_path);
                Some(std::fs::read(&image_path)?)
            };
            rammon::run_sim(&bind_addr, image.as_deref())
        }
        "checksum" => {
            let path = args.next().unwrap_or_default();
            if path.is_empty() {
                eprintln!("Usage: rammon checksum <file>");
                std::process::exit(1);
            }
            let data = std::fs::read(&path)?;
            println!("{:02X}", rammon_common::xor_checksum(&data));
            Ok(())
        }
        other => {
            eprintln!(
                "Unknown mode '{}'. Supported: sim [bind_addr] [image.bin], checksum <file>",
                other
            );
            std::process::exit(1);
        }
    }
}
