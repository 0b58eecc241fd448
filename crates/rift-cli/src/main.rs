//! RIFT CLI tools: channel key generation and self-test.

#![forbid(unsafe_code)]

use anyhow::{bail, ensure, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use rift_crypto::constants::NONCE_LEN;
use rift_crypto::nonce::increment;
use rift_crypto::{ChannelError, Encryptor, Role, SecureChannel};

#[derive(Parser, Debug)]
#[command(name = "rift")]
#[command(about = "RIFT secure channel tools")]
struct Args {
    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "RIFT_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a channel and print its public key (base64)
    Keygen {
        /// Channel role
        #[arg(short, long, env = "RIFT_ROLE", value_enum, default_value_t = RoleArg::Initiator)]
        role: RoleArg,
    },

    /// Pair two in-process channels and verify traffic both ways
    Selftest {
        /// Message to send
        #[arg(short, long, env = "RIFT_MESSAGE", default_value = "hello")]
        message: String,

        /// Number of messages in each direction
        #[arg(short, long, default_value_t = 3)]
        count: u32,
    },

    /// Show version information
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RoleArg {
    Initiator,
    Responder,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Initiator => Role::Initiator,
            RoleArg::Responder => Role::Responder,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    rift_common::init_tracing_with_default(&args.log_level);

    match args.command {
        Command::Keygen { role } => {
            let role = Role::from(role);
            let channel = SecureChannel::create(role).context("failed to create channel")?;
            println!("Role:       {}", role);
            println!("Public key: {}", STANDARD.encode(channel.local_public_key()));
        }
        Command::Selftest { message, count } => {
            selftest(message.as_bytes(), count)?;
            println!("Self-test passed: {} message(s) each way", count);
        }
        Command::Version => {
            println!("rift {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn exchange_keys<E: Encryptor>(initiator: &mut E, responder: &mut E) -> Result<()> {
    let mut initiator_key = initiator.local_public_key();
    let mut responder_key = responder.local_public_key();

    initiator
        .set_remote_public_key(&mut responder_key)
        .context("initiator rejected responder key")?;
    responder
        .set_remote_public_key(&mut initiator_key)
        .context("responder rejected initiator key")?;

    Ok(())
}

fn selftest(message: &[u8], count: u32) -> Result<()> {
    let mut client =
        SecureChannel::create(Role::Initiator).context("failed to create initiator channel")?;
    let mut host =
        SecureChannel::create(Role::Responder).context("failed to create responder channel")?;

    exchange_keys(&mut client, &mut host)?;
    info!("session keys exchanged");

    let mut previous_nonce: Option<[u8; NONCE_LEN]> = None;

    for i in 0..count {
        let sealed = client.encrypt(message).context("initiator encrypt failed")?;
        let opened = host.decrypt(&sealed).context("responder decrypt failed")?;
        ensure!(opened == message, "round-trip mismatch on message {}", i);

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&sealed[..NONCE_LEN]);
        match previous_nonce {
            Some(mut expected) => {
                increment(&mut expected);
                ensure!(expected == nonce, "nonce did not advance by one at message {}", i);
            }
            None => println!("First nonce: {}", hex::encode(nonce)),
        }
        previous_nonce = Some(nonce);

        let reply = host.encrypt(&opened).context("responder encrypt failed")?;
        let echoed = client.decrypt(&reply).context("initiator decrypt failed")?;
        ensure!(echoed == message, "echo mismatch on message {}", i);

        info!(message = i, wire_len = sealed.len(), "round-trip ok");
    }

    let mut tampered = client.encrypt(message).context("initiator encrypt failed")?;
    tampered[NONCE_LEN] ^= 0x01;
    match host.decrypt(&tampered) {
        Err(ChannelError::AuthenticationFailed) => info!("tampered message rejected"),
        Err(e) => bail!("tampered message rejected with unexpected error: {}", e),
        Ok(_) => bail!("tampered message was accepted"),
    }

    Ok(())
}
