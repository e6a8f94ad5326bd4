mod get_battlelog;
mod get_player;

pub use get_battlelog::GetBattlelogUseCase;
pub use get_player::GetPlayerUseCase;
