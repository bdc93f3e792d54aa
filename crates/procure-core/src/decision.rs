//! 採購決策模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// 決策分類（依決策樹判定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionClass {
    /// 庫存充足，持續觀察
    Monitor,
    /// 標準採購（EOQ 訂購）
    Standard,
    /// 緊急採購（提前期不足）
    Emergency,
}

impl DecisionClass {
    /// 升級順位（monitor → standard → emergency）
    pub fn rank(&self) -> u8 {
        match self {
            DecisionClass::Monitor => 0,
            DecisionClass::Standard => 1,
            DecisionClass::Emergency => 2,
        }
    }

    /// 檢查是否為相對 other 的升級
    pub fn escalates_from(&self, other: DecisionClass) -> bool {
        self.rank() > other.rank()
    }
}

/// 決策狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionState {
    /// 未確認
    Open,
    /// 已由外部確認
    Acknowledged,
    /// 被後續決策取代
    Superseded,
}

/// 採購決策
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcurementDecision {
    /// 決策ID
    pub id: Uuid,

    /// 物料ID
    pub material_id: String,

    /// 決策分類
    pub class: DecisionClass,

    /// 選定供應商（monitor 決策無供應商）
    pub supplier_id: Option<String>,

    /// 建議訂購量
    pub order_quantity: Decimal,

    /// 緊急加價標記（緊急採購繞過 EOQ）
    pub expedite_premium: bool,

    /// 判定軌跡（哪條規則觸發、為何）
    pub justification: Vec<String>,

    /// 決策狀態
    pub state: DecisionState,

    /// 決策時間
    pub decided_at: DateTime<Utc>,
}

impl ProcurementDecision {
    /// 創建新的決策記錄（初始為 Open）
    pub fn new(material_id: String, class: DecisionClass) -> Self {
        Self {
            id: Uuid::new_v4(),
            material_id,
            class,
            supplier_id: None,
            order_quantity: Decimal::ZERO,
            expedite_premium: false,
            justification: Vec::new(),
            state: DecisionState::Open,
            decided_at: Utc::now(),
        }
    }

    /// 建構器模式：設置供應商
    pub fn with_supplier(mut self, supplier_id: String) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    /// 建構器模式：設置訂購量
    pub fn with_order_quantity(mut self, quantity: Decimal) -> Self {
        self.order_quantity = quantity;
        self
    }

    /// 建構器模式：設置緊急加價標記
    pub fn with_expedite_premium(mut self, expedite: bool) -> Self {
        self.expedite_premium = expedite;
        self
    }

    /// 添加判定軌跡
    pub fn push_justification(&mut self, reason: impl Into<String>) {
        self.justification.push(reason.into());
    }

    /// 檢查是否為未確認決策
    pub fn is_open(&self) -> bool {
        self.state == DecisionState::Open
    }
}

/// 決策記錄結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOutcome {
    /// 記錄為新的未確認決策
    Recorded,
    /// 取代既有決策（升級）
    SupersededPrevious,
    /// 保留既有決策（不自動降級）
    KeptExisting,
}

/// 決策台帳
///
/// 維護「每物料至多一筆未確認決策」不變式；
/// 新決策僅在升級時取代既有決策，緊急決策不自動降級
#[derive(Debug, Clone, Default)]
pub struct DecisionLedger {
    open: HashMap<String, ProcurementDecision>,
    archive: Vec<ProcurementDecision>,
}

impl DecisionLedger {
    /// 創建空的台帳
    pub fn new() -> Self {
        Self {
            open: HashMap::new(),
            archive: Vec::new(),
        }
    }

    /// 記錄新決策
    pub fn record(&mut self, mut decision: ProcurementDecision) -> LedgerOutcome {
        match self.open.remove(&decision.material_id) {
            None => {
                self.open.insert(decision.material_id.clone(), decision);
                LedgerOutcome::Recorded
            }
            Some(mut existing) => {
                if decision.class.escalates_from(existing.class) {
                    existing.state = DecisionState::Superseded;
                    self.archive.push(existing);
                    self.open.insert(decision.material_id.clone(), decision);
                    LedgerOutcome::SupersededPrevious
                } else {
                    // 未升級：既有決策維持 Open，新決策進入稽核檔
                    decision.state = DecisionState::Superseded;
                    self.archive.push(decision);
                    let material_id = existing.material_id.clone();
                    self.open.insert(material_id, existing);
                    LedgerOutcome::KeptExisting
                }
            }
        }
    }

    /// 外部確認決策（緊急決策降級的唯一途徑）
    pub fn acknowledge(&mut self, material_id: &str) -> bool {
        match self.open.remove(material_id) {
            Some(mut decision) => {
                decision.state = DecisionState::Acknowledged;
                self.archive.push(decision);
                true
            }
            None => false,
        }
    }

    /// 讀取未確認決策
    pub fn open_decision(&self, material_id: &str) -> Option<&ProcurementDecision> {
        self.open.get(material_id)
    }

    /// 稽核檔（已確認與被取代的決策，不刪除）
    pub fn archive(&self) -> &[ProcurementDecision] {
        &self.archive
    }
}
