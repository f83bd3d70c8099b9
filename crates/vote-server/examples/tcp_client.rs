use std::env;

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use vote_protocol::command_codec::parse_command_line;
use vote_protocol::encode_input;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Where to connect: env override or default.
    let addr = env::var("VOTE_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    println!("Connecting to {}...", addr);
    let stream = TcpStream::connect(&addr).await?;
    println!("Connected.");
    println!("Type commands like:");
    println!("  color red");
    println!("  vote g1 yes");
    println!("  unvote g1");
    println!("  sync");
    println!("or a raw JSON event line. Type 'quit' or 'exit' to leave.\n");

    let (read_half, mut write_half) = stream.into_split();

    // Print every server event as it arrives.
    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => println!("<< {}", line),
                Ok(None) => {
                    println!("Server closed the connection.");
                    std::process::exit(0);
                }
                Err(e) => {
                    eprintln!("Read error: {:?}", e);
                    std::process::exit(1);
                }
            }
        }
    });

    let mut stdin = BufReader::new(io::stdin()).lines();

    while let Some(line) = stdin.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            println!("Exiting client.");
            return Ok(());
        }

        let frame = if trimmed.starts_with('{') {
            format!("{}\n", trimmed).into_bytes()
        } else {
            let Some(msg) = parse_command_line(trimmed) else {
                eprintln!("Could not parse command. Try `vote <group> <option>`.");
                continue;
            };
            match encode_input(&msg) {
                Ok(frame) => frame,
                Err(e) => {
                    eprintln!("Cannot send that: {}", e);
                    continue;
                }
            }
        };

        write_half.write_all(&frame).await?;
    }

    println!("\nEOF on stdin, exiting client.");
    Ok(())
}
