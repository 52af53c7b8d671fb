// Drive a full Update / Read / Format cycle against an in-process
// software tag, no hardware required.

use nfctype4::device::Device;
use nfctype4::tag::StaticTag;
use nfctype4::transport::TagTransport;
use nfctype4::utils::bytes_to_hex_spaced;

fn main() -> nfctype4::Result<()> {
    let mut device = Device::new(Box::new(TagTransport::new(StaticTag::new())));

    device.update(b"https://example.com")?;
    let message = device.read()?;
    println!(
        "read back {} bytes: {}",
        message.len(),
        bytes_to_hex_spaced(&message)
    );

    device.format()?;
    match device.read() {
        Err(err) => println!("after format: {}", err),
        Ok(_) => println!("after format the tag still had a message?"),
    }
    Ok(())
}
