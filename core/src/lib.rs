pub mod board;
pub mod channel;
pub mod context;
pub mod engine;
pub mod error;
pub mod game_data;
pub mod group;
pub mod ledger;
pub mod notify;
pub mod session;
pub mod slots;
pub mod storage;
pub mod subscription;

// Re-exports for convenience
pub use board::{BoardEdit, BossBoard, DamageTarget, UndoEffect};
pub use channel::{ChangeChannel, ChangeWaiter, WaitOutcome};
pub use context::{ConfigError, EngineConfig, EngineConfigExt};
pub use engine::{
    ApplyOutcome, CancelScope, ClanBattleEngine, EngineBuilder, ReportClearOutcome, ResolveOutcome,
    ResolveRequest, SaveLoadAction, SaveLoadOutcome, SubscribeOutcome, SubscribeTarget, UndoOutcome,
};
pub use error::{EngineError, ErrorKind};
pub use game_data::*;
pub use group::{GroupMeta, GroupRecord, Member, Role};
pub use ledger::{
    Admission, AttemptKind, ChallengeFilter, ChallengeRecord, DailyProgress, MemberProgress, NewChallenge, QuotaStatus,
    ScoreRow, UpgradePolicy, DAILY_ATTEMPTS,
};
pub use notify::{LogNotifier, NoNicknames, Notice, NicknameResolver, Notifier, NotifyError, NotifyTarget};
pub use session::{ChallengeSession, SessionTable};
pub use slots::{BackupSnapshot, SNAPSHOT_VERSION};
pub use storage::{BackupRecord, CommitReceipt, FileStore, MemoryStore, Store, StoreError, WriteOp};
pub use subscription::{Reminder, Subscription, SubscriptionBoard};
