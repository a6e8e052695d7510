// generate_key.rs
// Prints a fresh ENCRYPTION_MASTER_KEY for sealing stored provider API keys

#[path = "services/encryption.rs"]
#[allow(dead_code)]
mod encryption;

use encryption::KeyCipher;

fn main() {
    println!("Generating new AES-256 master key for provider API keys...\n");

    let key = KeyCipher::generate_master_key();

    println!("Add this to your .env file:");
    println!("─────────────────────────────────────────────────");
    println!("ENCRYPTION_MASTER_KEY={}", key);
    println!("─────────────────────────────────────────────────");
    println!("\n⚠️  IMPORTANT:");
    println!("  • Keep this key secure and never commit it to version control");
    println!("  • Keys saved while it is set can only be read back with the same key");
}
