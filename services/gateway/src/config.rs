//! Process configuration
//!
//! The bootstrap set: listen address, the markets to open, the seed user
//! records, and the balance credited to each seed user's vault account.

use std::net::SocketAddr;

/// A user record baked in at bootstrap
#[derive(Debug, Clone)]
pub struct SeedUser {
    pub id: i64,
    pub private_key_hex: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub markets: Vec<String>,
    pub seed_users: Vec<SeedUser>,
    /// Units credited to each seed user at startup
    pub seed_balance: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            markets: vec!["ETH".to_string()],
            seed_users: vec![
                SeedUser {
                    id: 8,
                    private_key_hex:
                        "829e924fdf021ba3dbbc4225edfece9aca04b929d6e75613329ca6f1d31c0bb4".into(),
                },
                SeedUser {
                    id: 7,
                    private_key_hex:
                        "a453611d9419d0e56f499079478fd72c37b251a94bfde4d19872c44cf65386e3".into(),
                },
                SeedUser {
                    id: 666,
                    private_key_hex:
                        "e485d098507f54e7733a205420dfddbe58db035fa577fc294ebd14db90767a52".into(),
                },
            ],
            seed_balance: 1_000_000,
        }
    }
}
