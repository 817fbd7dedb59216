//! Quick tour of the social network engine

use mingle_core::NetworkService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== mingle-core tour ===\n");

    let dir = std::env::temp_dir().join("mingle_tour");
    std::fs::create_dir_all(&dir)?;
    let mut service = NetworkService::open(dir.join("state.json")).await?;
    service.reset().await?;

    // 1: Accounts and sessions
    println!("1. Creating accounts...");
    service.create_user("ana", "secret", "Ana").await?;
    service.create_user("bia", "secret", "Bia").await?;
    let ana = service.login("ana", "secret")?;
    let bia = service.login("bia", "secret")?;
    println!("   Two accounts, two sessions");

    // 2: The friendship handshake
    println!("\n2. Friendship handshake...");
    service.add_friend(&ana, "bia").await?;
    println!("   After ana's request: friends = {}", service.is_friend("ana", "bia")?);
    service.add_friend(&bia, "ana").await?;
    println!("   After bia's confirmation: friends = {}", service.is_friend("ana", "bia")?);
    println!("   ana's friend list: {}", service.friends("ana")?);

    // 3: Direct messages
    println!("\n3. Direct messages...");
    service.send_message(&ana, "bia", "see you at the meetup?").await?;
    println!("   bia reads: {:?}", service.read_message(&bia).await?);

    // 4: Communities
    println!("\n4. Communities...");
    service.create_community(&ana, "rustaceans", "systems people").await?;
    service.join_community(&bia, "rustaceans").await?;
    println!("   Members: {}", service.community_members("rustaceans")?);
    service.broadcast(&bia, "rustaceans", "hello everyone").await?;
    println!("   ana reads: {:?}", service.read_community_message(&ana).await?);
    println!("   bia reads: {:?}", service.read_community_message(&bia).await?);

    service.reset().await?;
    println!("\n=== Done ===");
    Ok(())
}
