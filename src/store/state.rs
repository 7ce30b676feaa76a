use tokio::sync::watch;

/// 観測可能な状態セル
///
/// 書き込みはストアのみが行い、表示層は`subscribe`で変更通知を受け取る。
/// 置き換え・追記はいずれもセルのロック内で一度に適用されるため、
/// 読み手が中途半端な状態を観測することはない。
pub struct StateCell<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> StateCell<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// 現在値のスナップショットを取得
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// 現在値を参照して値を計算する（クローンしない）
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// 値を丸ごと置き換え、以前の値を返す
    pub fn replace(&self, value: T) -> T {
        self.tx.send_replace(value)
    }

    /// 現在値をその場で更新する
    pub fn modify(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// 実行中の操作数を数えるカウンター
///
/// 単一の真偽値フラグではなく参照カウント方式のため、操作が重なっても
/// 先に終わった操作が他の実行中の操作を「完了」扱いにすることはない。
pub struct PendingTracker {
    count: watch::Sender<usize>,
}

impl PendingTracker {
    pub fn new() -> Self {
        let (count, _rx) = watch::channel(0);
        Self { count }
    }

    /// 操作の開始を記録し、終了時にカウントを戻すガードを返す
    pub fn begin(&self) -> PendingGuard<'_> {
        self.count.send_modify(|n| *n += 1);
        PendingGuard { tracker: self }
    }

    pub fn count(&self) -> usize {
        *self.count.borrow()
    }

    /// いずれかの操作が実行中かどうか
    pub fn is_pending(&self) -> bool {
        self.count() > 0
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.count.subscribe()
    }

    /// 実行中の操作が無くなるまで待機する
    pub async fn wait_until_idle(&self) {
        let mut rx = self.count.subscribe();
        // 送信側は self が保持しているため、待機中にクローズされることはない
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    fn end(&self) {
        self.count.send_modify(|n| *n = n.saturating_sub(1));
    }
}

impl Default for PendingTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// 実行中の操作1件分を表すガード
///
/// 成功・失敗・早期リターン・Futureの破棄のいずれの経路でも、
/// ドロップ時に必ずカウントを1つ戻す。
#[must_use = "ガードを保持している間だけ操作が実行中として扱われる"]
pub struct PendingGuard<'a> {
    tracker: &'a PendingTracker,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.tracker.end();
    }
}
