//! BOM 圖
//!
//! 父件 → 子件的有向無環圖。所有遍歷都以驗證過的拓撲順序進行，
//! 循環在任何淨需求計算之前就被偵測並回報為結構性錯誤。

use mrp_core::{BomEdge, ItemId, MrpError};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// BOM 圖
#[derive(Debug, Clone, Default)]
pub struct BomGraph {
    edges: Vec<BomEdge>,
    /// 父件 → 關係索引
    children: BTreeMap<ItemId, Vec<usize>>,
    /// 子件 → 關係索引
    parents: BTreeMap<ItemId, Vec<usize>>,
}

impl BomGraph {
    /// 創建空的 BOM 圖
    pub fn new() -> Self {
        Self::default()
    }

    /// 由關係清單建立 BOM 圖，並驗證每筆關係與整體無循環
    pub fn from_edges(edges: Vec<BomEdge>) -> mrp_core::Result<Self> {
        let mut graph = Self::new();
        for edge in edges {
            edge.validate()?;
            graph.insert(edge);
        }
        graph.validate_acyclic()?;
        Ok(graph)
    }

    /// 添加一筆關係；若造成循環則拒絕且圖維持原狀
    pub fn add_edge(&mut self, edge: BomEdge) -> mrp_core::Result<()> {
        edge.validate()?;

        // 若子件已能走到父件，再加此關係就成環
        if let Some(mut path) = self.find_path(&edge.component_id, &edge.parent_id) {
            path.push(edge.component_id.clone());
            return Err(MrpError::CyclicBom { path });
        }

        self.insert(edge);
        Ok(())
    }

    fn insert(&mut self, edge: BomEdge) {
        let idx = self.edges.len();
        self.children
            .entry(edge.parent_id.clone())
            .or_default()
            .push(idx);
        self.parents
            .entry(edge.component_id.clone())
            .or_default()
            .push(idx);
        self.edges.push(edge);
    }

    /// 子件關係
    pub fn children<'a>(&'a self, parent_id: &str) -> impl Iterator<Item = &'a BomEdge> + 'a {
        self.children
            .get(parent_id)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.edges[idx])
    }

    /// 父件關係（反查 where-used）
    pub fn parents<'a>(&'a self, component_id: &str) -> impl Iterator<Item = &'a BomEdge> + 'a {
        self.parents
            .get(component_id)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.edges[idx])
    }

    pub fn edges(&self) -> &[BomEdge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 圖中所有物料
    pub fn items(&self) -> BTreeSet<&str> {
        self.children
            .keys()
            .chain(self.parents.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.children.contains_key(item_id) || self.parents.contains_key(item_id)
    }

    /// 是否為原材料（無子件）
    pub fn is_leaf(&self, item_id: &str) -> bool {
        !self.children.contains_key(item_id)
    }

    /// 子件提前期：以此物料為子件的關係中最大的提前期
    pub fn component_lead_time(&self, item_id: &str) -> Option<u32> {
        self.parents(item_id).map(|e| e.lead_time).max()
    }

    /// 拓撲排序（父件在前、子件在後）
    ///
    /// 使用 Kahn 演算法；剩餘無法排入的節點必在環上或環下游，據此回報循環路徑。
    pub fn topological_order(&self) -> mrp_core::Result<Vec<ItemId>> {
        let items = self.items();
        let mut in_degree: HashMap<&str, usize> = items
            .iter()
            .map(|&item| (item, self.parents.get(item).map_or(0, Vec::len)))
            .collect();

        let mut queue: VecDeque<&str> = items
            .iter()
            .copied()
            .filter(|item| in_degree[item] == 0)
            .collect();

        let mut order = Vec::with_capacity(items.len());
        while let Some(item) = queue.pop_front() {
            order.push(item.to_string());
            for edge in self.children(item) {
                if let Some(degree) = in_degree.get_mut(edge.component_id.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(edge.component_id.as_str());
                    }
                }
            }
        }

        if order.len() < items.len() {
            let remaining: BTreeSet<&str> = in_degree
                .iter()
                .filter(|(_, &d)| d > 0)
                .map(|(&item, _)| item)
                .collect();
            return Err(MrpError::CyclicBom {
                path: self.extract_cycle(&remaining),
            });
        }

        Ok(order)
    }

    /// 驗證無循環
    pub fn validate_acyclic(&self) -> mrp_core::Result<()> {
        self.topological_order().map(|_| ())
    }

    /// 低階碼：每個物料在所有 BOM 路徑中出現的最大深度
    ///
    /// 沒有父件的物料為 0 階。
    pub fn low_level_codes(&self) -> mrp_core::Result<BTreeMap<ItemId, u32>> {
        let order = self.topological_order()?;
        let mut codes: BTreeMap<ItemId, u32> = BTreeMap::new();

        for item in &order {
            let level = *codes.entry(item.clone()).or_insert(0);
            for edge in self.children(item) {
                let child = codes.entry(edge.component_id.clone()).or_insert(0);
                *child = (*child).max(level + 1);
            }
        }

        Ok(codes)
    }

    /// 從指定物料出發可到達的所有物料（含自身）
    pub fn reachable_from<'a, I>(&self, roots: I) -> BTreeSet<ItemId>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut visited: BTreeSet<ItemId> = BTreeSet::new();
        let mut stack: Vec<ItemId> = roots.into_iter().map(str::to_string).collect();

        while let Some(item) = stack.pop() {
            if visited.contains(&item) {
                continue;
            }
            for edge in self.children(&item) {
                if !visited.contains(&edge.component_id) {
                    stack.push(edge.component_id.clone());
                }
            }
            visited.insert(item);
        }

        visited
    }

    /// 尋找 from → to 的路徑（沿子件方向）
    fn find_path(&self, from: &str, to: &str) -> Option<Vec<ItemId>> {
        let mut predecessor: HashMap<&str, &str> = HashMap::new();
        let mut queue: VecDeque<&str> = VecDeque::from([from]);
        let mut seen: BTreeSet<&str> = BTreeSet::from([from]);

        while let Some(item) = queue.pop_front() {
            if item == to {
                let mut path = vec![item.to_string()];
                let mut current = item;
                while let Some(&prev) = predecessor.get(current) {
                    path.push(prev.to_string());
                    current = prev;
                }
                path.reverse();
                return Some(path);
            }
            for edge in self.children(item) {
                if seen.insert(edge.component_id.as_str()) {
                    predecessor.insert(edge.component_id.as_str(), item);
                    queue.push_back(edge.component_id.as_str());
                }
            }
        }

        None
    }

    /// 在 Kahn 剩餘節點中沿父件方向走，直到重複即得一個環
    fn extract_cycle(&self, remaining: &BTreeSet<&str>) -> Vec<ItemId> {
        let Some(&start) = remaining.iter().next() else {
            return Vec::new();
        };

        let mut walk: Vec<&str> = Vec::new();
        let mut position: HashMap<&str, usize> = HashMap::new();
        let mut current = start;

        loop {
            if let Some(&idx) = position.get(current) {
                // 走的是父件方向，反轉後成為父件 → 子件順序
                let mut cycle: Vec<ItemId> =
                    walk[idx..].iter().map(|s| s.to_string()).collect();
                cycle.reverse();
                cycle.push(cycle[0].clone());
                return cycle;
            }
            position.insert(current, walk.len());
            walk.push(current);

            match self
                .parents(current)
                .map(|e| e.parent_id.as_str())
                .find(|p| remaining.contains(p))
            {
                Some(parent) => current = parent,
                None => return walk.iter().map(|s| s.to_string()).collect(),
            }
        }
    }
}
