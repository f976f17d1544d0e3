//! Binary layout of scheduling trace records.
//!
//! Every record is 24 bytes: an 8-byte header followed by a 16-byte
//! payload whose meaning depends on the event kind. All integers are
//! little-endian.
//!
//! ```text
//!  0      1      2        4            8                        24
//!  | kind | cpu  |  pid   |    job     |        payload         |
//! ```

use crate::utils::config::{HEADER_SIZE, RECORD_SIZE, TASK_NAME_LEN};
use serde::{Deserialize, Serialize};

/// Event kind, as encoded in the first header byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Name,
    Param,
    Release,
    Assigned,
    SwitchTo,
    SwitchAway,
    Completion,
    Block,
    Resume,
    Action,
    SysRelease,
    Unknown(u8),
}

impl EventKind {
    /// Decode the kind byte
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Name,
            2 => Self::Param,
            3 => Self::Release,
            4 => Self::Assigned,
            5 => Self::SwitchTo,
            6 => Self::SwitchAway,
            7 => Self::Completion,
            8 => Self::Block,
            9 => Self::Resume,
            10 => Self::Action,
            11 => Self::SysRelease,
            other => Self::Unknown(other),
        }
    }

    /// Encode the kind byte
    pub fn code(self) -> u8 {
        match self {
            Self::Name => 1,
            Self::Param => 2,
            Self::Release => 3,
            Self::Assigned => 4,
            Self::SwitchTo => 5,
            Self::SwitchAway => 6,
            Self::Completion => 7,
            Self::Block => 8,
            Self::Resume => 9,
            Self::Action => 10,
            Self::SysRelease => 11,
            Self::Unknown(code) => code,
        }
    }
}

/// Record header shared by every event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventHeader {
    pub kind: EventKind,
    /// CPU whose trace buffer emitted the record
    pub cpu: u8,
    /// Task identifier (process id)
    pub pid: u16,
    /// Job sequence number
    pub job: u32,
}

/// Task parameters announced by a Param record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskParams {
    pub wcet: u32,
    pub period: u32,
    pub phase: u32,
    pub partition: u8,
    pub class: u8,
}

/// Kind-specific payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPayload {
    Name([u8; TASK_NAME_LEN]),
    Param(TaskParams),
    Release { release: u64, deadline: u64 },
    Assigned { when: u64, target: u8 },
    SwitchTo { when: u64, exec_time: u32 },
    SwitchAway { when: u64, exec_time: u64 },
    Completion { when: u64, forced: bool },
    Block { when: u64 },
    Resume { when: u64 },
    Action { when: u64, action: u8 },
    SysRelease { when: u64, release: u64 },
    Unknown,
}

/// One decoded trace record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub header: EventHeader,
    pub payload: EventPayload,
}

impl EventRecord {
    /// Decode a record from exactly `RECORD_SIZE` bytes
    ///
    /// **Public** - used by `RecordStore::record_at`
    ///
    /// Any byte pattern decodes; unknown kinds become `EventKind::Unknown`.
    pub fn decode(bytes: &[u8; RECORD_SIZE]) -> Self {
        let kind = EventKind::from_code(bytes[0]);
        let header = EventHeader {
            kind,
            cpu: bytes[1],
            pid: u16::from_le_bytes([bytes[2], bytes[3]]),
            job: read_u32(bytes, 4),
        };

        let first = read_u64(bytes, HEADER_SIZE);
        let second = read_u64(bytes, HEADER_SIZE + 8);

        let payload = match kind {
            EventKind::Name => {
                let mut name = [0u8; TASK_NAME_LEN];
                name.copy_from_slice(&bytes[HEADER_SIZE..HEADER_SIZE + TASK_NAME_LEN]);
                EventPayload::Name(name)
            }
            EventKind::Param => EventPayload::Param(TaskParams {
                wcet: read_u32(bytes, HEADER_SIZE),
                period: read_u32(bytes, HEADER_SIZE + 4),
                phase: read_u32(bytes, HEADER_SIZE + 8),
                partition: bytes[HEADER_SIZE + 12],
                class: bytes[HEADER_SIZE + 13],
            }),
            EventKind::Release => EventPayload::Release {
                release: first,
                deadline: second,
            },
            EventKind::Assigned => EventPayload::Assigned {
                when: first,
                target: bytes[HEADER_SIZE + 8],
            },
            EventKind::SwitchTo => EventPayload::SwitchTo {
                when: first,
                exec_time: read_u32(bytes, HEADER_SIZE + 8),
            },
            EventKind::SwitchAway => EventPayload::SwitchAway {
                when: first,
                exec_time: second,
            },
            EventKind::Completion => EventPayload::Completion {
                when: first,
                forced: bytes[HEADER_SIZE + 8] & 0x1 != 0,
            },
            EventKind::Block => EventPayload::Block { when: first },
            EventKind::Resume => EventPayload::Resume { when: first },
            EventKind::Action => EventPayload::Action {
                when: first,
                action: bytes[HEADER_SIZE + 8],
            },
            EventKind::SysRelease => EventPayload::SysRelease {
                when: first,
                release: second,
            },
            EventKind::Unknown(_) => EventPayload::Unknown,
        };

        Self { header, payload }
    }

    /// Encode the record back into its binary form
    ///
    /// **Public** - used to build synthetic traces in tests and tools
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        out[0] = self.header.kind.code();
        out[1] = self.header.cpu;
        out[2..4].copy_from_slice(&self.header.pid.to_le_bytes());
        out[4..8].copy_from_slice(&self.header.job.to_le_bytes());

        let p = &mut out[HEADER_SIZE..];
        match self.payload {
            EventPayload::Name(name) => p.copy_from_slice(&name),
            EventPayload::Param(params) => {
                p[0..4].copy_from_slice(&params.wcet.to_le_bytes());
                p[4..8].copy_from_slice(&params.period.to_le_bytes());
                p[8..12].copy_from_slice(&params.phase.to_le_bytes());
                p[12] = params.partition;
                p[13] = params.class;
            }
            EventPayload::Release { release, deadline } => {
                p[0..8].copy_from_slice(&release.to_le_bytes());
                p[8..16].copy_from_slice(&deadline.to_le_bytes());
            }
            EventPayload::SysRelease { when, release } => {
                p[0..8].copy_from_slice(&when.to_le_bytes());
                p[8..16].copy_from_slice(&release.to_le_bytes());
            }
            EventPayload::SwitchAway { when, exec_time } => {
                p[0..8].copy_from_slice(&when.to_le_bytes());
                p[8..16].copy_from_slice(&exec_time.to_le_bytes());
            }
            EventPayload::SwitchTo { when, exec_time } => {
                p[0..8].copy_from_slice(&when.to_le_bytes());
                p[8..12].copy_from_slice(&exec_time.to_le_bytes());
            }
            EventPayload::Assigned { when, target: byte }
            | EventPayload::Action { when, action: byte } => {
                p[0..8].copy_from_slice(&when.to_le_bytes());
                p[8] = byte;
            }
            EventPayload::Completion { when, forced } => {
                p[0..8].copy_from_slice(&when.to_le_bytes());
                p[8] = u8::from(forced);
            }
            EventPayload::Block { when } | EventPayload::Resume { when } => {
                p[0..8].copy_from_slice(&when.to_le_bytes());
            }
            EventPayload::Unknown => {}
        }
        out
    }

    pub fn kind(&self) -> EventKind {
        self.header.kind
    }

    pub fn pid(&self) -> u16 {
        self.header.pid
    }

    pub fn job(&self) -> u32 {
        self.header.job
    }

    /// Merge key of the record
    ///
    /// Name, Param and unknown records carry no time of their own and sort
    /// at 0, ahead of the job events they describe.
    pub fn timestamp(&self) -> u64 {
        match self.payload {
            EventPayload::Release { release: when, .. }
            | EventPayload::Assigned { when, .. }
            | EventPayload::SwitchTo { when, .. }
            | EventPayload::SwitchAway { when, .. }
            | EventPayload::Completion { when, .. }
            | EventPayload::Block { when }
            | EventPayload::Resume { when }
            | EventPayload::Action { when, .. }
            | EventPayload::SysRelease { when, .. } => when,
            EventPayload::Name(_) | EventPayload::Param(_) | EventPayload::Unknown => 0,
        }
    }

    /// Task name carried by a Name record, trimmed at the first NUL
    pub fn task_name(&self) -> Option<String> {
        match &self.payload {
            EventPayload::Name(raw) => {
                let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
                Some(String::from_utf8_lossy(&raw[..end]).into_owned())
            }
            _ => None,
        }
    }
}

/// Convenience constructors for synthetic records
impl EventRecord {
    pub fn name(pid: u16, name: &str) -> Self {
        let mut raw = [0u8; TASK_NAME_LEN];
        let bytes = name.as_bytes();
        let len = bytes.len().min(TASK_NAME_LEN);
        raw[..len].copy_from_slice(&bytes[..len]);
        Self::with(EventKind::Name, pid, 0, EventPayload::Name(raw))
    }

    pub fn param(pid: u16, params: TaskParams) -> Self {
        Self::with(EventKind::Param, pid, 0, EventPayload::Param(params))
    }

    pub fn release(pid: u16, job: u32, release: u64, deadline: u64) -> Self {
        Self::with(
            EventKind::Release,
            pid,
            job,
            EventPayload::Release { release, deadline },
        )
    }

    pub fn switch_to(pid: u16, job: u32, when: u64) -> Self {
        Self::with(
            EventKind::SwitchTo,
            pid,
            job,
            EventPayload::SwitchTo { when, exec_time: 0 },
        )
    }

    pub fn switch_away(pid: u16, job: u32, when: u64) -> Self {
        Self::with(
            EventKind::SwitchAway,
            pid,
            job,
            EventPayload::SwitchAway { when, exec_time: 0 },
        )
    }

    pub fn completion(pid: u16, job: u32, when: u64, forced: bool) -> Self {
        Self::with(
            EventKind::Completion,
            pid,
            job,
            EventPayload::Completion { when, forced },
        )
    }

    pub fn sys_release(when: u64, release: u64) -> Self {
        Self::with(
            EventKind::SysRelease,
            0,
            0,
            EventPayload::SysRelease { when, release },
        )
    }

    fn with(kind: EventKind, pid: u16, job: u32, payload: EventPayload) -> Self {
        Self {
            header: EventHeader {
                kind,
                cpu: 0,
                pid,
                job,
            },
            payload,
        }
    }
}

fn read_u32(bytes: &[u8; RECORD_SIZE], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(raw)
}

fn read_u64(bytes: &[u8; RECORD_SIZE], at: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(raw)
}
